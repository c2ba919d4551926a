//! Optimization passes.
//!
//! Each pass is a [Step] with a short name that the driver can select.  Steps
//! run in order over the whole program, sharing one [StepContext], and the
//! program is re-validated after every step.

use std::str::FromStr;

use derive_more::Display;
use log::debug;

use crate::commons::Valid;
use crate::front_end::Block;

pub mod common_switch_prefix;
pub mod name_substitution;
pub mod syntactic_equality;

#[cfg(test)]
mod tests;

/// State shared by the steps of one optimizer run.
#[derive(Clone, Debug, Default)]
pub struct StepContext {}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Step {
    #[display(fmt = "common-switch-prefix")]
    CommonSwitchPrefix,
}

impl Step {
    pub const ALL: [Step; 1] = [Step::CommonSwitchPrefix];

    // the single-letter abbreviation accepted on the command line.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Step::CommonSwitchPrefix => "o",
        }
    }

    pub fn run(self, context: &mut StepContext, block: &mut Block) {
        match self {
            Step::CommonSwitchPrefix => common_switch_prefix::run(context, block),
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.to_string() == s || step.abbreviation() == s)
            .ok_or_else(|| format!("unknown optimization step: {s}"))
    }
}

/// Runs `steps` in order.  Panics if a step produces an invalid program.
pub fn run_steps(steps: &[Step], context: &mut StepContext, program: Valid<Block>) -> Valid<Block> {
    steps.iter().fold(program, |Valid(mut block), step| {
        debug!("running step {step}");
        step.run(context, &mut block);
        block
            .validate()
            .unwrap_or_else(|e| panic!("step {step} produced an invalid program:\n{e}"))
    })
}
