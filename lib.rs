//! An optimizer for a small structured intermediate language.
//!
//! The front end parses, prints and validates programs; the middle end holds
//! name analyses and the optimization steps that rewrite them.

pub mod commons;
pub mod front_end;
pub mod middle_end;
