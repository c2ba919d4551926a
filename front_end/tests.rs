// front end tests: parsing, printing and validation.

use pretty_assertions::assert_eq;

use super::*;
use crate::commons::*;

// parse, print, parse again: the printed text must describe the same program.
fn round_trips(code: &str) {
    let program = parse(code).unwrap();
    let printed = program.to_string();
    let reparsed = parse(&printed).unwrap_or_else(|e| panic!("{e}\nin:\n{printed}"));
    assert_eq!(reparsed, program);
    assert_eq!(reparsed.to_string(), printed);
}

// the validation messages for a program that parses.
fn validation_errors(code: &str) -> Vec<String> {
    match parse(code).unwrap().validate() {
        Ok(_) => vec![],
        Err(e) => e.errors().to_vec(),
    }
}

fn parse_error(code: &str) -> String {
    match parse(code) {
        Ok(program) => panic!("expected a parse error, got:\n{program}"),
        Err(ParseError(msg)) => msg,
    }
}

// SECTION: parsing

#[test]
fn parses_every_statement_kind() {
    let program = parse(
        r#"
    {
        let a, b:u256 := pair(1, "two")
        let c
        a, c := swap(c, a)
        sstore(a, 0x2a)
        function f(x, y:bool) -> r { r := x leave }
        if lt(a, b) { { } }
        switch a
        case 0 { pop(1) }
        case true:bool { }
        default { }
        for { let i := 0 } lt(i, 10) { i := add(i, 1) } { break continue }
    }
    "#,
    )
    .unwrap();

    assert_eq!(program.statements.len(), 8);
    assert_eq!(
        program.statements[0],
        Statement::VariableDeclaration(VariableDeclaration {
            variables: vec![
                TypedName::untyped("a"),
                TypedName {
                    name: "b".to_string(),
                    typ: Some("u256".to_string())
                }
            ],
            value: Some(call(
                "pair",
                vec![
                    num("1"),
                    Expression::Literal(Literal {
                        kind: LiteralKind::String,
                        value: "two".to_string(),
                        typ: None
                    })
                ]
            )),
        })
    );
    assert_eq!(program.statements[1], let_stmt(&["c"], None));
    assert_eq!(
        program.statements[2],
        Statement::Assignment {
            targets: vec!["a".to_string(), "c".to_string()],
            value: call("swap", vec![id("c"), id("a")]),
        }
    );
    assert_eq!(
        program.statements[3],
        Statement::ExpressionStatement(call("sstore", vec![id("a"), num("0x2a")]))
    );

    let Statement::Switch(switch) = &program.statements[6] else {
        panic!("expected a switch, got {}", program.statements[6]);
    };
    assert_eq!(switch.cases.len(), 3);
    assert_eq!(switch.cases[0].value, Some(Literal::number("0")));
    assert_eq!(
        switch.cases[1].value,
        Some(Literal {
            kind: LiteralKind::Boolean,
            value: "true".to_string(),
            typ: Some("bool".to_string()),
        })
    );
    assert_eq!(switch.cases[2].value, None);

    let Statement::ForLoop(for_loop) = &program.statements[7] else {
        panic!("expected a for loop, got {}", program.statements[7]);
    };
    assert_eq!(for_loop.pre.statements, vec![let_stmt(&["i"], Some(num("0")))]);
    assert_eq!(for_loop.body.statements, vec![Statement::Break, Statement::Continue]);
}

#[test]
fn skips_comments() {
    let program = parse("{ // a comment\n f() /* another\n one */ g() }").unwrap();
    assert_eq!(
        program.statements,
        vec![
            Statement::ExpressionStatement(call("f", vec![])),
            Statement::ExpressionStatement(call("g", vec![])),
        ]
    );
}

#[test]
fn block_comments_may_contain_stars() {
    let program = parse("{ /**/ f() /* a ** b * / c **/ g() /*\n * x\n */ }").unwrap();
    assert_eq!(
        program.statements,
        vec![
            Statement::ExpressionStatement(call("f", vec![])),
            Statement::ExpressionStatement(call("g", vec![])),
        ]
    );
}

#[test]
fn round_trip() {
    round_trips(
        r#"
    {
        let x := calldataload(0)
        function g(a) -> b, c { b := a c := a }
        switch x
        case 0 { let y := 1 { let y := 2 } }
        case 0x01 { for { } 1 { } { if x { continue } break } }
        default { }
        let s := "text":string
    }
    "#,
    );
}

// SECTION: printing

#[test]
fn prints_canonical_text() {
    let program = parse(
        "{ let a := 1 switch a case 0 { f(a) } default { } for { let i := 0 } lt(i, 2) { } { g(i) } }",
    )
    .unwrap();

    let expected = "{
    let a := 1
    switch a
    case 0 {
        f(a)
    }
    default { }
    for {
        let i := 0
    } lt(i, 2) { } {
        g(i)
    }
}";
    assert_eq!(program.to_string(), expected);
}

#[test]
fn prints_functions_and_literals() {
    let program = parse(r#"{ function f(a:u256, b) -> r { r := "s" } }"#).unwrap();
    assert_eq!(
        program.to_string(),
        "{\n    function f(a:u256, b) -> r {\n        r := \"s\"\n    }\n}"
    );
}

// SECTION: parse errors

#[test]
fn switch_without_cases_is_a_parse_error() {
    let msg = parse_error("{ switch x }");
    assert!(msg.contains("switch_r: expected: Case, Default"), "{msg}");
}

#[test]
fn unrecognized_input_is_a_lex_error() {
    let msg = parse_error("{ let a := #1 }");
    assert_eq!(msg, "lex error: unrecognized input `#` at offset 11");
}

#[test]
fn missing_brace() {
    let msg = parse_error("{ f()");
    assert!(msg.contains("unexpected end of input"), "{msg}");
}

#[test]
fn trailing_input() {
    let msg = parse_error("{ } f()");
    assert!(msg.contains("expected end of input after the program block"), "{msg}");
    assert!(msg.contains("line 0, column 4"), "{msg}");
}

#[test]
fn assignment_needs_gets() {
    let msg = parse_error("{ a, b }");
    assert!(msg.contains("expected: Gets, OpenParen"), "{msg}");
}

// SECTION: validation

#[test]
fn valid_program() {
    assert_eq!(
        validation_errors(
            "{ let a := 1 switch a case 0 { } case 1 { } default { } \
             for { } 1 { } { break } function f() { leave } }"
        ),
        Vec::<String>::new()
    );
}

#[test]
fn duplicate_case_values_are_compared_numerically() {
    assert_eq!(
        validation_errors("{ switch x case 1 { } case 0x01 { } }"),
        vec!["duplicate case 0x01 in switch on x".to_string()]
    );
}

#[test]
fn break_outside_loop() {
    assert_eq!(
        validation_errors("{ break }"),
        vec!["break outside of a loop body".to_string()]
    );
}

#[test]
fn continue_in_loop_post() {
    assert_eq!(
        validation_errors("{ for { } 1 { continue } { } }"),
        vec!["continue outside of a loop body".to_string()]
    );
}

#[test]
fn break_does_not_cross_functions() {
    assert_eq!(
        validation_errors("{ for { } 1 { } { function f() { break } } }"),
        vec!["break outside of a loop body".to_string()]
    );
}

#[test]
fn leave_outside_function() {
    assert_eq!(
        validation_errors("{ leave }"),
        vec!["leave outside of a function body".to_string()]
    );
}

#[test]
fn duplicate_declarations() {
    assert_eq!(
        validation_errors(
            "{ let a, a := f() function g(x) -> x { } function h() { } function h() { } }"
        ),
        vec![
            "h is declared more than once in the same block".to_string(),
            "a is declared more than once in a single variable declaration".to_string(),
            "x is declared more than once in the parameters and returns of function g".to_string(),
        ]
    );
}

#[test]
fn redeclaring_in_a_nested_block_is_fine() {
    assert_eq!(
        validation_errors("{ let a := 1 { let a := 2 } function f() { } { function f() { } } }"),
        Vec::<String>::new()
    );
}

#[test]
fn reserved_words_are_not_identifiers() {
    let program = Block::new(vec![let_stmt(&["switch"], Some(num("1")))]);
    let err = program.validate().unwrap_err();
    assert_eq!(
        err.errors(),
        ["reserved word \"switch\" used as identifier".to_string()]
    );
}

#[test]
fn malformed_identifiers() {
    let program = Block::new(vec![Statement::ExpressionStatement(call(
        "f",
        vec![id("1abc")],
    ))]);
    let err = program.validate().unwrap_err();
    assert_eq!(err.errors(), ["1abc is an invalid identifier".to_string()]);
}

#[test]
fn switch_shapes() {
    let empty = Statement::Switch(Switch {
        expression: id("x"),
        cases: vec![],
    });
    let misplaced_default = Statement::Switch(Switch {
        expression: id("y"),
        cases: vec![
            Case {
                value: None,
                body: Block::default(),
            },
            Case {
                value: Some(Literal::number("0")),
                body: Block::default(),
            },
        ],
    });
    let two_defaults = Statement::Switch(Switch {
        expression: id("z"),
        cases: vec![
            Case {
                value: None,
                body: Block::default(),
            },
            Case {
                value: None,
                body: Block::default(),
            },
        ],
    });

    let err = Block::new(vec![empty, misplaced_default, two_defaults])
        .validate()
        .unwrap_err();
    assert_eq!(
        err.errors(),
        [
            "switch on x has no cases".to_string(),
            "the default case of the switch on y is not the last case".to_string(),
            "switch on z has 2 default cases".to_string(),
        ]
    );
}

#[test]
fn errors_are_reported_one_per_line() {
    let err = parse("{ break leave }").unwrap().validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "break outside of a loop body\nleave outside of a function body\n"
    );
}

#[test]
fn skip_validation_keeps_invalid_programs() {
    let program = parse("{ break }").unwrap();
    assert_eq!(skip_validation(program.clone()).0, program);
}

// SECTION: serialization

#[test]
fn json_round_trip() {
    let program = parse(r#"{ let a:u256 := f("x", true) switch a case 1 { } default { leave } }"#)
        .unwrap();
    let json = serde_json::to_string(&program).unwrap();
    let back: Block = serde_json::from_str(&json).unwrap();
    assert_eq!(back, program);
}
