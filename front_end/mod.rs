//! The front end: abstract syntax, lexing, parsing, printing and validation of
//! intermediate language programs.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use lexer::*;
pub use parser::*;

#[cfg(test)]
mod tests;
