//! Utilities shared by the front end and the middle end.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::AddAssign;

/// A value that passed validation.  Optimization steps take and return
/// `Valid` programs so that every step starts from a checked tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Valid<T>(pub T);

/// Wrap a value without checking it.  Only for tests and for tools that want
/// to look at programs the validator rejects.
pub fn skip_validation<T>(value: T) -> Valid<T> {
    Valid(value)
}

// All the problems found while validating a program, in the order they were
// found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<String>,
}

impl ValidationError {
    pub fn new() -> Self {
        ValidationError { errors: vec![] }
    }

    pub fn add_error(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl AddAssign for ValidationError {
    fn add_assign(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
