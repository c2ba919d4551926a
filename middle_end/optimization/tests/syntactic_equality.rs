use pretty_assertions::assert_eq;

use super::super::syntactic_equality::*;
use super::*;

fn statement(code: &str) -> Statement {
    let mut statements = statements(&format!("{{ {code} }}"));
    assert_eq!(statements.len(), 1, "expected a single statement: {code}");
    statements.remove(0)
}

fn equal(lhs: &str, rhs: &str) -> bool {
    let (lhs, rhs) = (statement(lhs), statement(rhs));
    let result = syntactically_equal(&lhs, &rhs);
    assert_eq!(
        result,
        syntactically_equal(&rhs, &lhs),
        "equality must be symmetric"
    );
    result
}

#[test]
fn identical_statements() {
    assert!(equal("sstore(0, 1)", "sstore(0, 1)"));
    assert!(equal("x := add(y, 0x10)", "x := add(y, 0x10)"));
    assert!(equal("break", "break"));
    assert!(equal("if c { f() }", "if c { f() }"));
}

#[test]
fn free_identifiers_must_match() {
    assert!(!equal("f(a)", "f(b)"));
    assert!(!equal("a := 1", "b := 1"));
}

#[test]
fn structure_must_match() {
    assert!(!equal("f(a)", "g(a)"));
    assert!(!equal("f(a)", "f(a, a)"));
    assert!(!equal("f(1)", "f(2)"));
    assert!(!equal("f(1)", "f(1:u8)"));
    assert!(!equal(r#"f("1")"#, "f(1)"));
    assert!(!equal("f(true)", "f(false)"));
    assert!(!equal("break", "continue"));
    assert!(!equal("{ f() }", "f()"));
    assert!(!equal("{ f() }", "{ f() g() }"));
}

#[test]
fn declared_names_do_not_matter() {
    assert!(equal("let a := 1", "let b := 1"));
    assert!(equal("let a, b := f(x)", "let d, c := f(x)"));
    assert!(equal("let a", "let b"));
}

#[test]
fn declarations_must_agree_on_the_rest() {
    assert!(!equal("let a := 1", "let a := 2"));
    assert!(!equal("let a := f()", "let a, b := f()"));
    assert!(!equal("let a:u256 := 1", "let a := 1"));
    assert!(!equal("let a := 1", "let a"));
}

#[test]
fn initializers_are_compared_before_the_names_are_bound() {
    assert!(!equal("let a := a", "let b := b"));
    assert!(equal("let a := x", "let b := x"));
}

#[test]
fn bound_names_correspond() {
    assert!(equal("{ let a := 1 f(a) }", "{ let b := 1 f(b) }"));
    assert!(equal(
        "{ let a, b := f() g(b, a) }",
        "{ let c, d := f() g(d, c) }"
    ));
    assert!(!equal(
        "{ let a, b := f() g(a, b) }",
        "{ let c, d := f() g(d, c) }"
    ));
}

#[test]
fn bound_and_free_names_differ() {
    assert!(!equal("{ let a := 1 f(b) }", "{ let b := 1 f(b) }"));
    assert!(!equal("{ let a := 1 a := 2 }", "{ let b := 1 a := 2 }"));
}

#[test]
fn shadowing_is_resolved_innermost_first() {
    assert!(equal(
        "{ let a := 1 { let a := 2 f(a) } g(a) }",
        "{ let b := 1 { let c := 2 f(c) } g(b) }"
    ));
    assert!(!equal(
        "{ let a := 1 { let a := 2 f(a) } g(a) }",
        "{ let b := 1 { let c := 2 f(b) } g(b) }"
    ));
}

#[test]
fn functions() {
    assert!(equal(
        "function f(a) -> r { r := a }",
        "function f(x) -> y { y := x }"
    ));
    assert!(!equal(
        "function f(a) -> r { r := a }",
        "function g(a) -> r { r := a }"
    ));
    assert!(!equal("function f(a, b) { }", "function f(a) { }"));
    assert!(!equal("function f(a:u8) { }", "function f(a) { }"));
}

#[test]
fn loops() {
    assert!(equal(
        "for { let i := 0 } lt(i, 3) { i := add(i, 1) } { g(i) }",
        "for { let j := 0 } lt(j, 3) { j := add(j, 1) } { g(j) }"
    ));
    assert!(!equal(
        "for { let i := 0 } lt(i, 3) { i := add(i, 1) } { g(i) }",
        "for { let j := 0 } lt(j, 3) { j := add(j, 1) } { g(i) }"
    ));
}

#[test]
fn switches() {
    assert!(equal(
        "switch x case 0 { let a := 1 f(a) } default { }",
        "switch x case 0 { let b := 1 f(b) } default { }"
    ));
    assert!(!equal(
        "switch x case 0 { } default { }",
        "switch x case 1 { } default { }"
    ));
    assert!(!equal("switch x case 0 { }", "switch x case 0 { } default { }"));
}

#[test]
fn oracle() {
    let oracle = SyntacticEquality;
    assert!(oracle.equivalent(&statement("let a := 1"), &statement("let b := 1")));
    assert!(!oracle.equivalent(&statement("f(a)"), &statement("f(b)")));
}
