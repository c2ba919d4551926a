//! Scope-aware name analysis of intermediate language code.
//!
//! Everything here is built on [for_each_reference], which walks statements
//! while tracking the names bound by scopes opened *inside* the walked code.
//! An occurrence of a name that none of those scopes binds is free: it refers
//! to a declaration outside the walked code.

use std::collections::BTreeSet as Set;
use std::slice;

use crate::front_end::*;


/// How an identifier occurrence uses its variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// A stack of scopes, innermost last, each holding the names it binds.
#[derive(Clone, Debug)]
pub struct Scopes {
    frames: Vec<Set<String>>,
}

impl Scopes {
    // starts with one open scope.
    pub fn new() -> Self {
        Scopes {
            frames: vec![Set::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Set::new());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    // binds `name` in the innermost scope.
    pub fn bind(&mut self, name: &str) {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.insert(name.to_string());
            }
            None => self.frames.push(Set::from([name.to_string()])),
        }
    }

    pub fn binds(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains(name))
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Scopes::new()
    }
}

/// Calls `f` on every identifier occurrence in `statements`, in evaluation
/// order, together with the scopes opened inside `statements` at that point.
/// The statements are walked as the body of one block.
pub fn for_each_reference(statements: &[Statement], f: &mut impl FnMut(&str, Access, &Scopes)) {
    let mut walker = ReferenceWalker {
        scopes: Scopes::new(),
        f,
    };
    walker.statements(statements);
}

struct ReferenceWalker<'f, F> {
    scopes: Scopes,
    f: &'f mut F,
}

impl<F: FnMut(&str, Access, &Scopes)> ReferenceWalker<'_, F> {
    fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn block(&mut self, block: &Block) {
        self.scopes.push();
        self.statements(&block.statements);
        self.scopes.pop();
    }

    fn statement(&mut self, statement: &Statement) {
        use Statement::*;

        match statement {
            ExpressionStatement(expression) => self.expression(expression),
            Assignment { targets, value } => {
                self.expression(value);
                for target in targets {
                    (self.f)(target, Access::Write, &self.scopes);
                }
            }
            VariableDeclaration(decl) => {
                if let Some(value) = &decl.value {
                    self.expression(value);
                }
                for name in decl.names() {
                    self.scopes.bind(name);
                }
            }
            FunctionDefinition(def) => {
                self.scopes.push();
                for variable in def.params.iter().chain(&def.returns) {
                    self.scopes.bind(&variable.name);
                }
                self.block(&def.body);
                self.scopes.pop();
            }
            If { condition, body } => {
                self.expression(condition);
                self.block(body);
            }
            Switch(switch) => {
                self.expression(&switch.expression);
                for case in &switch.cases {
                    self.block(&case.body);
                }
            }
            ForLoop(for_loop) => {
                // the scope of `pre` covers the rest of the loop.
                self.scopes.push();
                self.statements(&for_loop.pre.statements);
                self.expression(&for_loop.condition);
                self.block(&for_loop.post);
                self.block(&for_loop.body);
                self.scopes.pop();
            }
            Break | Continue | Leave => {}
            Block(block) => self.block(block),
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Literal(_) => {}
            Expression::Identifier(name) => (self.f)(name, Access::Read, &self.scopes),
            Expression::FunctionCall { args, .. } => {
                for arg in args {
                    self.expression(arg);
                }
            }
        }
    }
}

// SECTION: derived queries

/// Names that occur free in `statements`.
pub fn free_names(statements: &[Statement]) -> Set<String> {
    let mut names = Set::new();
    for_each_reference(statements, &mut |name, _, scopes| {
        if !scopes.binds(name) {
            names.insert(name.to_string());
        }
    });
    names
}

/// Variables read by an expression.  Expressions bind nothing, so this is
/// every identifier in it.
pub fn referenced_names(expression: &Expression) -> Set<String> {
    match expression {
        Expression::Literal(_) => Set::new(),
        Expression::Identifier(name) => Set::from([name.clone()]),
        Expression::FunctionCall { args, .. } => args.iter().flat_map(referenced_names).collect(),
    }
}

/// Variables declared outside `statement` that it may assign to, at any depth.
pub fn written_names(statement: &Statement) -> Set<String> {
    let mut names = Set::new();
    for_each_reference(slice::from_ref(statement), &mut |name, access, scopes| {
        if access == Access::Write && !scopes.binds(name) {
            names.insert(name.to_string());
        }
    });
    names
}

/// Names a statement declares in the scope it appears in.
pub fn declared_names(statement: &Statement) -> Set<String> {
    match statement {
        Statement::VariableDeclaration(decl) => decl.names().map(String::from).collect(),
        _ => Set::new(),
    }
}

/// Names of the functions called anywhere in `statement`.
pub fn called_functions(statement: &Statement) -> Set<String> {
    let mut calls = Set::new();
    statement_calls(statement, &mut calls);
    calls
}

fn statement_calls(statement: &Statement, calls: &mut Set<String>) {
    use Statement::*;

    let blocks: Vec<&ast::Block> = match statement {
        ExpressionStatement(value) | Assignment { value, .. } => {
            expression_calls(value, calls);
            vec![]
        }
        VariableDeclaration(decl) => {
            if let Some(value) = &decl.value {
                expression_calls(value, calls);
            }
            vec![]
        }
        FunctionDefinition(def) => vec![&def.body],
        If { condition, body } => {
            expression_calls(condition, calls);
            vec![body]
        }
        Switch(switch) => {
            expression_calls(&switch.expression, calls);
            switch.cases.iter().map(|case| &case.body).collect()
        }
        ForLoop(for_loop) => {
            expression_calls(&for_loop.condition, calls);
            vec![&for_loop.pre, &for_loop.post, &for_loop.body]
        }
        Break | Continue | Leave => vec![],
        Block(block) => vec![block],
    };

    for statement in blocks.into_iter().flat_map(|block| &block.statements) {
        statement_calls(statement, calls);
    }
}

fn expression_calls(expression: &Expression, calls: &mut Set<String>) {
    if let Expression::FunctionCall { function, args } = expression {
        calls.insert(function.clone());
        for arg in args {
            expression_calls(arg, calls);
        }
    }
}
