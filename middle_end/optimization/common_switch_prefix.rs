//! Hoisting of the common prefix of switch cases.
//!
//! When every case of a switch starts with the same statement, that statement
//! is moved in front of the switch and executed once.  Declarations may differ
//! in the names they introduce: the first case's names are kept and the other
//! cases are rewritten to use them.
//!
//! ```text
//! switch x                           let a := 1
//! case 0 { let a := 1 f(a) }   ==>   switch x
//! default { let b := 1 g(b) }        case 0 { f(a) }
//!                                    default { g(a) }
//! ```
//!
//! The program may shadow names, so a statement is only hoisted when moving it
//! can't change which declaration any identifier refers to:
//!
//! - the statement doesn't declare or assign a variable of the scrutinee,
//! - the statement isn't a function definition and calls no function defined
//!   in a case body,
//! - names it declares aren't used after the switch,
//! - renaming the rest of each case neither captures a renamed occurrence nor
//!   redirects a reference to an outer variable to a hoisted one.
//!
//! Inner switches are handled before the switches that contain them.

use std::collections::{BTreeMap as Map, BTreeSet as Set};
use std::mem;

use log::{debug, trace};

use super::name_substitution::{preserves_bindings, substitute, NameSubstitution};
use super::syntactic_equality::{StatementEquivalence, SyntacticEquality};
use super::StepContext;
use crate::commons::Valid;
use crate::front_end::*;
use crate::middle_end::analysis::*;

pub fn run(_context: &mut StepContext, block: &mut Block) {
    CommonSwitchPrefixMover::new(SyntacticEquality).block(block);
}

pub fn move_common_switch_prefix(program: Valid<Block>) -> Valid<Block> {
    let Valid(mut block) = program;
    CommonSwitchPrefixMover::new(SyntacticEquality).block(&mut block);
    block
        .validate()
        .unwrap_or_else(|e| panic!("hoisting produced an invalid program:\n{e}"))
}

/// The hoisting pass, parameterized by the statement equivalence it trusts.
pub struct CommonSwitchPrefixMover<E> {
    equivalence: E,
}

impl<E: StatementEquivalence> CommonSwitchPrefixMover<E> {
    pub fn new(equivalence: E) -> Self {
        CommonSwitchPrefixMover { equivalence }
    }

    pub fn block(&self, block: &mut Block) {
        self.statements(&mut block.statements, &Set::new());
    }

    // `live_after` holds the names read by code that follows `statements` in
    // the same scope.
    fn statements(&self, statements: &mut Vec<Statement>, live_after: &Set<String>) {
        let mut i = 0;
        while i < statements.len() {
            self.nested(&mut statements[i]);

            if matches!(statements[i], Statement::Switch(_)) {
                let mut live = free_names(&statements[i + 1..]);
                live.extend(live_after.iter().cloned());

                let hoisted = match &mut statements[i] {
                    Statement::Switch(switch) => self.hoist_prefix(switch, &live),
                    _ => vec![],
                };
                let count = hoisted.len();
                statements.splice(i..i, hoisted);
                i += count;
            }

            i += 1;
        }
    }

    fn nested(&self, statement: &mut Statement) {
        match statement {
            Statement::FunctionDefinition(def) => self.block(&mut def.body),
            Statement::If { body, .. } => self.block(body),
            Statement::Switch(switch) => {
                for case in &mut switch.cases {
                    self.block(&mut case.body);
                }
            }
            Statement::ForLoop(for_loop) => {
                // declarations in `pre` stay visible for the rest of the loop.
                let mut live = referenced_names(&for_loop.condition);
                live.extend(free_names(&for_loop.post.statements));
                live.extend(free_names(&for_loop.body.statements));
                self.statements(&mut for_loop.pre.statements, &live);
                self.block(&mut for_loop.post);
                self.block(&mut for_loop.body);
            }
            Statement::Block(block) => self.block(block),
            Statement::ExpressionStatement(_)
            | Statement::Assignment { .. }
            | Statement::VariableDeclaration(_)
            | Statement::Break
            | Statement::Continue
            | Statement::Leave => {}
        }
    }

    // removes the common prefix from the cases of `switch` and returns it.
    fn hoist_prefix(&self, switch: &mut Switch, live_after: &Set<String>) -> Vec<Statement> {
        let scrutinee = &switch.expression;
        let Some((first, others)) = switch.cases.split_first_mut() else {
            panic!("internal error: switch on {scrutinee} has no cases");
        };

        let pinned = Pinned {
            scrutinee_names: referenced_names(scrutinee),
            case_functions: others
                .iter()
                .chain([&*first])
                .flat_map(|case| &case.body.statements)
                .filter_map(|statement| match statement {
                    Statement::FunctionDefinition(def) => Some(def.name.clone()),
                    _ => None,
                })
                .collect(),
        };

        // one renaming per case after the first, mapping the names the case
        // declared in the prefix to the first case's names.
        let mut renamings = vec![Map::new(); others.len()];
        let mut hoisted_names = Set::new();
        let mut prefix = 0;

        while let Some(reference) = first.body.statements.get(prefix) {
            if !pinned.allows(reference) {
                break;
            }

            let all_equal = others.iter().zip(&renamings).all(|(case, renaming)| {
                case.body.statements.get(prefix).is_some_and(|candidate| {
                    let candidate = NameSubstitution::new(renaming).statement(candidate);
                    self.equivalence.equivalent(reference, &candidate)
                })
            });
            if !all_equal {
                break;
            }

            if let Statement::VariableDeclaration(decl) = reference {
                let mut extended = renamings.clone();
                for (case, renaming) in others.iter().zip(&mut extended) {
                    let Statement::VariableDeclaration(own) = &case.body.statements[prefix] else {
                        panic!(
                            "internal error: `{reference}` was judged equal to a statement that is not a declaration"
                        );
                    };
                    assert_eq!(
                        own.variables.len(),
                        decl.variables.len(),
                        "internal error: declarations of different arity were judged equal to `{reference}`"
                    );
                    for (own_name, name) in own.names().zip(decl.names()) {
                        renaming.insert(own_name.to_string(), name.to_string());
                    }
                }

                if decl.names().any(|name| live_after.contains(name)) {
                    trace!("not hoisting `{reference}`: it declares a name used after the switch");
                    break;
                }
                // a second declaration of a hoisted name would capture the
                // occurrences already renamed to it.
                if decl.names().any(|name| hoisted_names.contains(name)) {
                    break;
                }

                let mut reserved = hoisted_names.clone();
                reserved.extend(decl.names().map(String::from));
                let preserved = others.iter().zip(&extended).all(|(case, renaming)| {
                    preserves_bindings(&case.body.statements[prefix + 1..], renaming, &reserved)
                });
                if !preserved {
                    trace!("not hoisting `{reference}`: renaming would rebind an identifier");
                    break;
                }

                renamings = extended;
                hoisted_names = reserved;
            } else if others.iter().any(|case| {
                matches!(
                    case.body.statements[prefix],
                    Statement::VariableDeclaration(_)
                )
            }) {
                panic!(
                    "internal error: a declaration was judged equal to `{reference}`, which is not a declaration"
                );
            }

            prefix += 1;
        }

        if prefix == 0 {
            return vec![];
        }

        let rest = first.body.statements.split_off(prefix);
        let hoisted = mem::replace(&mut first.body.statements, rest);
        for (case, renaming) in others.iter_mut().zip(&renamings) {
            let rest = case.body.statements.split_off(prefix);
            case.body.statements = if renaming.is_empty() {
                rest
            } else {
                substitute(&rest, renaming)
            };
        }

        debug!(
            "hoisted {prefix} statement(s) out of switch on {}",
            switch.expression
        );
        hoisted
    }
}

// what a hoisted statement must not touch.
struct Pinned {
    // variables read by the scrutinee, which is evaluated after the hoisted code.
    scrutinee_names: Set<String>,
    // functions defined at the top level of a case body, which are only visible
    // inside that body.
    case_functions: Set<String>,
}

impl Pinned {
    fn allows(&self, statement: &Statement) -> bool {
        !matches!(statement, Statement::FunctionDefinition(_))
            && declared_names(statement).is_disjoint(&self.scrutinee_names)
            && written_names(statement).is_disjoint(&self.scrutinee_names)
            && called_functions(statement).is_disjoint(&self.case_functions)
    }
}
