//! Syntactic equality of statements up to consistent renaming of the
//! variables they declare.
//!
//! Two statements are equal when they have the same shape, the same literals,
//! the same callee and function names, and their identifiers correspond: a
//! variable bound inside the first statement must be matched by the variable
//! bound at the same place inside the second, and a free variable must be
//! matched by a free variable of the same name.

use std::collections::BTreeMap as Map;

use crate::front_end::*;

/// Decides whether two statements behave the same, up to renaming of the
/// variables they declare internally.
pub trait StatementEquivalence {
    fn equivalent(&self, lhs: &Statement, rhs: &Statement) -> bool;
}

/// The structural equivalence used by the optimizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntacticEquality;

impl StatementEquivalence for SyntacticEquality {
    fn equivalent(&self, lhs: &Statement, rhs: &Statement) -> bool {
        syntactically_equal(lhs, rhs)
    }
}

pub fn syntactically_equal(lhs: &Statement, rhs: &Statement) -> bool {
    let mut comparison = Comparison::default();
    comparison.push();
    comparison.statement(lhs, rhs)
}

// SECTION: comparison state

// the variables bound so far on both sides.  Corresponding bindings get the
// same number, so two identifiers match when they resolve to the same number.
#[derive(Default)]
struct Comparison {
    lhs: Vec<Map<String, usize>>,
    rhs: Vec<Map<String, usize>>,
    next_binding: usize,
}

impl Comparison {
    fn push(&mut self) {
        self.lhs.push(Map::new());
        self.rhs.push(Map::new());
    }

    fn pop(&mut self) {
        self.lhs.pop();
        self.rhs.pop();
    }

    fn bind(&mut self, lhs: &str, rhs: &str) {
        let binding = self.next_binding;
        self.next_binding += 1;
        if let (Some(l), Some(r)) = (self.lhs.last_mut(), self.rhs.last_mut()) {
            l.insert(lhs.to_string(), binding);
            r.insert(rhs.to_string(), binding);
        }
    }

    fn names(&mut self, lhs: &[TypedName], rhs: &[TypedName]) -> bool {
        if lhs.len() != rhs.len() || lhs.iter().zip(rhs).any(|(l, r)| l.typ != r.typ) {
            return false;
        }
        for (l, r) in lhs.iter().zip(rhs) {
            self.bind(&l.name, &r.name);
        }
        true
    }

    fn identifier(&self, lhs: &str, rhs: &str) -> bool {
        match (resolve(&self.lhs, lhs), resolve(&self.rhs, rhs)) {
            (Some(l), Some(r)) => l == r,
            (None, None) => lhs == rhs,
            _ => false,
        }
    }

    // SECTION: structural comparison

    fn block(&mut self, lhs: &Block, rhs: &Block) -> bool {
        self.push();
        let equal = self.statements(&lhs.statements, &rhs.statements);
        self.pop();
        equal
    }

    fn statements(&mut self, lhs: &[Statement], rhs: &[Statement]) -> bool {
        lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| self.statement(l, r))
    }

    fn statement(&mut self, lhs: &Statement, rhs: &Statement) -> bool {
        use Statement::*;

        match (lhs, rhs) {
            (ExpressionStatement(l), ExpressionStatement(r)) => self.expression(l, r),
            (
                Assignment {
                    targets: l_targets,
                    value: l_value,
                },
                Assignment {
                    targets: r_targets,
                    value: r_value,
                },
            ) => {
                l_targets.len() == r_targets.len()
                    && self.expression(l_value, r_value)
                    && l_targets
                        .iter()
                        .zip(r_targets)
                        .all(|(l, r)| self.identifier(l, r))
            }
            (VariableDeclaration(l), VariableDeclaration(r)) => {
                // the initializer is evaluated before the names come into scope.
                let values_equal = match (&l.value, &r.value) {
                    (Some(l), Some(r)) => self.expression(l, r),
                    (None, None) => true,
                    _ => false,
                };
                values_equal && self.names(&l.variables, &r.variables)
            }
            (FunctionDefinition(l), FunctionDefinition(r)) => {
                if l.name != r.name {
                    return false;
                }
                self.push();
                let equal = self.names(&l.params, &r.params)
                    && self.names(&l.returns, &r.returns)
                    && self.block(&l.body, &r.body);
                self.pop();
                equal
            }
            (
                If {
                    condition: l_condition,
                    body: l_body,
                },
                If {
                    condition: r_condition,
                    body: r_body,
                },
            ) => self.expression(l_condition, r_condition) && self.block(l_body, r_body),
            (Switch(l), Switch(r)) => {
                self.expression(&l.expression, &r.expression)
                    && l.cases.len() == r.cases.len()
                    && l.cases
                        .iter()
                        .zip(&r.cases)
                        .all(|(l, r)| l.value == r.value && self.block(&l.body, &r.body))
            }
            (ForLoop(l), ForLoop(r)) => {
                self.push();
                let equal = self.statements(&l.pre.statements, &r.pre.statements)
                    && self.expression(&l.condition, &r.condition)
                    && self.block(&l.post, &r.post)
                    && self.block(&l.body, &r.body);
                self.pop();
                equal
            }
            (Break, Break) | (Continue, Continue) | (Leave, Leave) => true,
            (Block(l), Block(r)) => self.block(l, r),
            _ => false,
        }
    }

    fn expression(&mut self, lhs: &Expression, rhs: &Expression) -> bool {
        match (lhs, rhs) {
            (Expression::Literal(l), Expression::Literal(r)) => l == r,
            (Expression::Identifier(l), Expression::Identifier(r)) => self.identifier(l, r),
            (
                Expression::FunctionCall {
                    function: l_function,
                    args: l_args,
                },
                Expression::FunctionCall {
                    function: r_function,
                    args: r_args,
                },
            ) => {
                l_function == r_function
                    && l_args.len() == r_args.len()
                    && l_args
                        .iter()
                        .zip(r_args)
                        .all(|(l, r)| self.expression(l, r))
            }
            _ => false,
        }
    }
}

// looks `name` up innermost scope first.
fn resolve(scopes: &[Map<String, usize>], name: &str) -> Option<usize> {
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.get(name).copied())
}
