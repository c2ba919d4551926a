//! The abstract syntax of the intermediate language.
//!
//! Programs are blocks of statements.  Blocks open a scope; a variable
//! declaration binds its names from the next statement to the end of the
//! enclosing block.  Function names live in their own namespace.

use serde::{Deserialize, Serialize};

mod display;
mod validate;

pub use validate::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    // a function call evaluated for its effects.
    ExpressionStatement(Expression),
    // `a, b := f()`
    Assignment {
        targets: Vec<String>,
        value: Expression,
    },
    VariableDeclaration(VariableDeclaration),
    FunctionDefinition(FunctionDefinition),
    If {
        condition: Expression,
        body: Block,
    },
    Switch(Switch),
    ForLoop(ForLoop),
    Break,
    Continue,
    // return from the enclosing function.
    Leave,
    Block(Block),
}

/// `let a, b:u256 := value`.  `variables` is never empty in a valid program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub variables: Vec<TypedName>,
    pub value: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedName {
    pub name: String,
    pub typ: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<TypedName>,
    pub returns: Vec<TypedName>,
    pub body: Block,
}

/// A multi-way branch.  The first case whose value equals the scrutinee runs;
/// the default case (no value) runs when none matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub expression: Expression,
    pub cases: Vec<Case>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    // None for the default case.
    pub value: Option<Literal>,
    pub body: Block,
}

/// `for { pre } condition { post } { body }`.  The scope of `pre` extends over
/// the condition, `post` and `body`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForLoop {
    pub pre: Block,
    pub condition: Expression,
    pub post: Block,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),
    Identifier(String),
    FunctionCall {
        function: String,
        args: Vec<Expression>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    // the source text; string literals are stored without their quotes.
    pub value: String,
    pub typ: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiteralKind {
    Number,
    Boolean,
    String,
}

// SECTION: constructors and accessors

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }
}

impl VariableDeclaration {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }
}

impl TypedName {
    pub fn untyped(name: &str) -> Self {
        TypedName {
            name: name.to_string(),
            typ: None,
        }
    }
}

impl Literal {
    pub fn number(value: &str) -> Self {
        Literal {
            kind: LiteralKind::Number,
            value: value.to_string(),
            typ: None,
        }
    }
}

pub fn id(name: &str) -> Expression {
    Expression::Identifier(name.to_string())
}

pub fn num(value: &str) -> Expression {
    Expression::Literal(Literal::number(value))
}

pub fn call(function: &str, args: Vec<Expression>) -> Expression {
    Expression::FunctionCall {
        function: function.to_string(),
        args,
    }
}

pub fn let_stmt(names: &[&str], value: Option<Expression>) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        variables: names.iter().map(|n| TypedName::untyped(n)).collect(),
        value,
    })
}
