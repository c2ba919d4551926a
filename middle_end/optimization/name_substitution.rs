//! Scope-respecting renaming of free variables.
//!
//! [substitute] replaces the free occurrences of the mapped names in a
//! sequence of statements, read or written.  Occurrences under a
//! re-declaration of the same name refer to the inner variable and are left
//! alone.  Declarations keep their own names, and callee names are never
//! touched.  [preserves_bindings] checks beforehand that renaming will not
//! make an occurrence refer to a different variable.

use std::collections::{BTreeMap as Map, BTreeSet as Set};

use crate::front_end::*;
use crate::middle_end::analysis::{for_each_reference, Scopes};

/// Renames free variables according to `map`.  All names are renamed
/// simultaneously, so `{a -> b, b -> a}` swaps two variables.
pub fn substitute(statements: &[Statement], map: &Map<String, String>) -> Vec<Statement> {
    NameSubstitution::new(map).statements(statements)
}

/// Whether applying `map` to `statements` and then declaring `reserved` right
/// before them keeps every identifier pointing at the same variable.  Fails
/// when an occurrence would be captured by a declaration inside
/// `statements`, or when a free occurrence of a name that is not renamed
/// would be captured by one of the `reserved` declarations.
pub fn preserves_bindings(
    statements: &[Statement],
    map: &Map<String, String>,
    reserved: &Set<String>,
) -> bool {
    let mut preserved = true;
    for_each_reference(statements, &mut |name, _, scopes| {
        if scopes.binds(name) {
            return;
        }
        preserved &= match map.get(name) {
            Some(new_name) => !scopes.binds(new_name),
            None => !reserved.contains(name),
        };
    });
    preserved
}

pub struct NameSubstitution<'m> {
    map: &'m Map<String, String>,
    // mapped names that are re-declared inside the translated code.
    scopes: Scopes,
}

impl<'m> NameSubstitution<'m> {
    pub fn new(map: &'m Map<String, String>) -> Self {
        NameSubstitution {
            map,
            scopes: Scopes::new(),
        }
    }

    // translates statements in the current scope.
    pub fn statements(&mut self, statements: &[Statement]) -> Vec<Statement> {
        statements.iter().map(|s| self.statement(s)).collect()
    }

    pub fn block(&mut self, block: &Block) -> Block {
        self.scopes.push();
        let statements = self.statements(&block.statements);
        self.scopes.pop();
        Block { statements }
    }

    pub fn statement(&mut self, statement: &Statement) -> Statement {
        use Statement::*;

        match statement {
            ExpressionStatement(expression) => ExpressionStatement(self.expression(expression)),
            Assignment { targets, value } => Assignment {
                targets: targets.iter().map(|t| self.name(t)).collect(),
                value: self.expression(value),
            },
            VariableDeclaration(decl) => {
                let value = decl.value.as_ref().map(|v| self.expression(v));
                self.declare(&decl.variables);
                VariableDeclaration(ast::VariableDeclaration {
                    variables: decl.variables.clone(),
                    value,
                })
            }
            FunctionDefinition(def) => {
                self.scopes.push();
                self.declare(&def.params);
                self.declare(&def.returns);
                let body = self.block(&def.body);
                self.scopes.pop();
                FunctionDefinition(ast::FunctionDefinition {
                    body,
                    ..def.clone()
                })
            }
            If { condition, body } => If {
                condition: self.expression(condition),
                body: self.block(body),
            },
            Switch(switch) => Switch(ast::Switch {
                expression: self.expression(&switch.expression),
                cases: switch
                    .cases
                    .iter()
                    .map(|case| ast::Case {
                        value: case.value.clone(),
                        body: self.block(&case.body),
                    })
                    .collect(),
            }),
            ForLoop(for_loop) => {
                self.scopes.push();
                let pre = ast::Block::new(self.statements(&for_loop.pre.statements));
                let condition = self.expression(&for_loop.condition);
                let post = self.block(&for_loop.post);
                let body = self.block(&for_loop.body);
                self.scopes.pop();
                ForLoop(ast::ForLoop {
                    pre,
                    condition,
                    post,
                    body,
                })
            }
            Break => Break,
            Continue => Continue,
            Leave => Leave,
            Block(block) => Block(self.block(block)),
        }
    }

    pub fn expression(&self, expression: &Expression) -> Expression {
        match expression {
            Expression::Literal(_) => expression.clone(),
            Expression::Identifier(name) => Expression::Identifier(self.name(name)),
            Expression::FunctionCall { function, args } => Expression::FunctionCall {
                function: function.clone(),
                args: args.iter().map(|arg| self.expression(arg)).collect(),
            },
        }
    }

    fn name(&self, name: &str) -> String {
        match self.map.get(name) {
            Some(new_name) if !self.scopes.binds(name) => new_name.clone(),
            _ => name.to_string(),
        }
    }

    fn declare(&mut self, variables: &[TypedName]) {
        for variable in variables {
            if self.map.contains_key(&variable.name) {
                self.scopes.bind(&variable.name);
            }
        }
    }
}
