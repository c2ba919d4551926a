use pretty_assertions::assert_eq;

use super::{run_steps, Step, StepContext};
use crate::commons::Valid;
use crate::front_end::*;

mod syntactic_equality;

// Parse and validate a program given in the concrete syntax.
fn program(code: &str) -> Valid<Block> {
    parse(code)
        .unwrap_or_else(|e| panic!("{e}"))
        .validate()
        .unwrap_or_else(|e| panic!("invalid test program:\n{e}"))
}

// The statements of a program, for the components that work on statement
// sequences.
fn statements(code: &str) -> Vec<Statement> {
    parse(code).unwrap_or_else(|e| panic!("{e}")).statements
}

// Read given test file, run given pass, and compare the result to the expected
// program from given result file.  Both sides are compared in their printed
// form, so the files may use any layout.
fn run_test(test_name: &str, pass: fn(Valid<Block>) -> Valid<Block>, pass_name: &str) {
    let read = |input_file: &str| {
        String::from_utf8(
            std::fs::read(input_file)
                .unwrap_or_else(|_| panic!("Could not read the input file {}", input_file)),
        )
        .expect("The input file does not contain valid utf-8 text")
    };

    let input_program = program(&read(&format!("test-data/{test_name}.il")));

    let actual = pass(input_program).0.to_string();

    let expected = program(&read(&format!("test-data/{test_name}.{pass_name}.il")))
        .0
        .to_string();

    assert_eq!(actual, expected);
}

// SECTION: step registry

#[test]
fn steps_by_name_and_abbreviation() {
    assert_eq!("common-switch-prefix".parse::<Step>(), Ok(Step::CommonSwitchPrefix));
    assert_eq!("o".parse::<Step>(), Ok(Step::CommonSwitchPrefix));
    assert_eq!(
        "dce".parse::<Step>(),
        Err("unknown optimization step: dce".to_string())
    );
    assert_eq!(Step::CommonSwitchPrefix.to_string(), "common-switch-prefix");
}

#[test]
fn steps_run_in_order() {
    let input = program("{ switch x case 0 { f() g() } default { f() g() } }");
    let expected = program("{ f() g() switch x case 0 { } default { } }");

    let mut context = StepContext::default();
    let once = run_steps(&[Step::CommonSwitchPrefix], &mut context, input.clone());
    assert_eq!(once, expected);

    let twice = run_steps(
        &[Step::CommonSwitchPrefix, Step::CommonSwitchPrefix],
        &mut context,
        input,
    );
    assert_eq!(twice, expected);
}

#[test]
fn no_steps_is_the_identity() {
    let input = program("{ switch x case 0 { f() } default { f() } }");
    let output = run_steps(&[], &mut StepContext::default(), input.clone());
    assert_eq!(output, input);
}
