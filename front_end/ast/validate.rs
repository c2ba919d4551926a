// check whether a Block is a valid program:
//
// - identifiers:
//     - all identifiers match the pattern "(alpha|_|$)(alphanumeric|_|$|.)*".
//     - identifiers aren't reserved words.
// - switches:
//     - every switch has at least one case.
//     - there is at most one default case, and it comes last.
//     - no two cases match the same value (numbers are compared by value, so
//       `0x01` and `1` are the same case).
// - declarations:
//     - no name is declared twice by the same variable declaration.
//     - function parameters and return variables are pairwise distinct.
//     - no two functions with the same name are defined in the same block.
// - control flow:
//     - break and continue only occur inside a loop body (not in its
//       condition blocks, and not across a function boundary).
//     - leave only occurs inside a function body.
//
// the checks do not resolve identifiers: programs may refer to names declared
// outside of the code being optimized.

use super::*;
use crate::commons::*;

use std::collections::BTreeSet as Set;

const RESERVED: [&str; 13] = [
    "let", "function", "if", "switch", "case", "default", "for", "break", "continue", "leave",
    "true", "false", "hex",
];

// SECTION: program validation

impl Block {
    pub fn validate(self) -> Result<Valid<Block>, ValidationError> {
        validate(&self).map(|()| Valid(self))
    }

    pub fn check_valid(&self) -> Result<(), ValidationError> {
        validate(self)
    }
}

pub fn validate(program: &Block) -> Result<(), ValidationError> {
    // each check is a separate walk over the program, which keeps them
    // independent.
    let mut errors = ValidationError::new();
    errors += check_identifiers(program);
    errors += check_switches(program);
    errors += check_declarations(program);
    errors += check_control_flow(program, Context::default());

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// SECTION: traversal helpers

// calls `f` on every statement of the block, outermost first.
fn for_each_statement<'a>(block: &'a Block, f: &mut impl FnMut(&'a Statement)) {
    for statement in &block.statements {
        f(statement);
        for nested in nested_blocks(statement) {
            for_each_statement(nested, f);
        }
    }
}

fn nested_blocks(statement: &Statement) -> Vec<&Block> {
    use Statement::*;

    match statement {
        FunctionDefinition(def) => vec![&def.body],
        If { body, .. } => vec![body],
        Switch(switch) => switch.cases.iter().map(|case| &case.body).collect(),
        ForLoop(for_loop) => vec![&for_loop.pre, &for_loop.post, &for_loop.body],
        Block(block) => vec![block],
        ExpressionStatement(_) | Assignment { .. } | VariableDeclaration(_) | Break | Continue
        | Leave => vec![],
    }
}

fn for_each_expression<'a>(statement: &'a Statement, f: &mut impl FnMut(&'a Expression)) {
    fn walk<'a>(expression: &'a Expression, f: &mut impl FnMut(&'a Expression)) {
        f(expression);
        if let Expression::FunctionCall { args, .. } = expression {
            for arg in args {
                walk(arg, f);
            }
        }
    }

    match statement {
        Statement::ExpressionStatement(e) | Statement::Assignment { value: e, .. } => walk(e, f),
        Statement::VariableDeclaration(decl) => {
            if let Some(value) = &decl.value {
                walk(value, f);
            }
        }
        Statement::If { condition, .. } => walk(condition, f),
        Statement::Switch(switch) => walk(&switch.expression, f),
        Statement::ForLoop(for_loop) => walk(&for_loop.condition, f),
        Statement::FunctionDefinition(_)
        | Statement::Break
        | Statement::Continue
        | Statement::Leave
        | Statement::Block(_) => {}
    }
}

// SECTION: checks

// - identifiers:
//     - all identifiers match the pattern "(alpha|_|$)(alphanumeric|_|$|.)*".
//     - identifiers aren't reserved words.
fn check_identifiers(program: &Block) -> ValidationError {
    let mut err = ValidationError::new();

    let mut check = |s: &str| {
        let is_start = |c: char| c.is_ascii_alphabetic() || c == '_' || c == '$';
        let is_rest = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.';
        match s.chars().next() {
            None => err.add_error("identifier cannot be the empty string".to_string()),
            Some(hdr) if !is_start(hdr) || !s.chars().skip(1).all(is_rest) => {
                err.add_error(format!("{s} is an invalid identifier"))
            }
            Some(_) if RESERVED.contains(&s) => {
                err.add_error(format!("reserved word \"{s}\" used as identifier"))
            }
            Some(_) => {}
        }
    };

    for_each_statement(program, &mut |statement| {
        match statement {
            Statement::VariableDeclaration(decl) => decl.names().for_each(&mut check),
            Statement::Assignment { targets, .. } => targets.iter().for_each(|t| check(t)),
            Statement::FunctionDefinition(def) => {
                check(&def.name);
                def.params.iter().chain(&def.returns).for_each(|v| check(&v.name));
            }
            _ => {}
        }
        for_each_expression(statement, &mut |expression| match expression {
            Expression::Identifier(name) => check(name),
            Expression::FunctionCall { function, .. } => check(function),
            Expression::Literal(_) => {}
        });
    });

    err
}

// - every switch has at least one case.
// - there is at most one default case, and it comes last.
// - no two cases match the same value.
fn check_switches(program: &Block) -> ValidationError {
    let mut err = ValidationError::new();

    for_each_statement(program, &mut |statement| {
        let Statement::Switch(switch) = statement else {
            return;
        };

        if switch.cases.is_empty() {
            err.add_error(format!("switch on {} has no cases", switch.expression));
            return;
        }

        let defaults = switch.cases.iter().filter(|c| c.value.is_none()).count();
        if defaults > 1 {
            err.add_error(format!(
                "switch on {} has {defaults} default cases",
                switch.expression
            ));
        } else if defaults == 1 && switch.cases.last().map_or(false, |c| c.value.is_some()) {
            err.add_error(format!(
                "the default case of the switch on {} is not the last case",
                switch.expression
            ));
        }

        let mut seen = Set::new();
        for value in switch.cases.iter().filter_map(|c| c.value.as_ref()) {
            if !seen.insert(case_key(value)) {
                err.add_error(format!(
                    "duplicate case {value} in switch on {}",
                    switch.expression
                ));
            }
        }
    });

    err
}

// the value a case matches, normalized so that different spellings of the same
// number compare equal.
fn case_key(literal: &Literal) -> (LiteralKind, String) {
    let normalized = match literal.kind {
        LiteralKind::Number => {
            let parsed = match literal.value.strip_prefix("0x") {
                Some(hex) => u128::from_str_radix(hex, 16),
                None => literal.value.parse::<u128>(),
            };
            parsed.map_or_else(|_| literal.value.clone(), |n| n.to_string())
        }
        LiteralKind::Boolean | LiteralKind::String => literal.value.clone(),
    };
    (literal.kind, normalized)
}

// - no name is declared twice by the same variable declaration.
// - function parameters and return variables are pairwise distinct.
// - no two functions with the same name are defined in the same block.
fn check_declarations(program: &Block) -> ValidationError {
    let mut err = ValidationError::new();

    let mut blocks = vec![program];
    for_each_statement(program, &mut |statement| blocks.extend(nested_blocks(statement)));

    for block in blocks {
        let function_names = block.statements.iter().filter_map(|s| match s {
            Statement::FunctionDefinition(def) => Some(def.name.as_str()),
            _ => None,
        });
        check_distinct(&mut err, "the same block", function_names);

        for statement in &block.statements {
            match statement {
                Statement::VariableDeclaration(decl) => {
                    check_distinct(&mut err, "a single variable declaration", decl.names())
                }
                Statement::FunctionDefinition(def) => check_distinct(
                    &mut err,
                    &format!("the parameters and returns of function {}", def.name),
                    def.params.iter().chain(&def.returns).map(|v| v.name.as_str()),
                ),
                _ => {}
            }
        }
    }

    err
}

fn check_distinct<'a>(err: &mut ValidationError, what: &str, names: impl Iterator<Item = &'a str>) {
    let mut seen = Set::new();
    for name in names {
        if !seen.insert(name) {
            err.add_error(format!("{name} is declared more than once in {what}"));
        }
    }
}

// Where a statement sits, for the control flow checks.
#[derive(Clone, Copy, Default)]
struct Context {
    in_loop_body: bool,
    in_function: bool,
}

// - break and continue only occur inside a loop body.
// - leave only occurs inside a function body.
fn check_control_flow(block: &Block, ctx: Context) -> ValidationError {
    let mut err = ValidationError::new();

    for statement in &block.statements {
        match statement {
            Statement::Break | Statement::Continue if !ctx.in_loop_body => {
                err.add_error(format!("{statement} outside of a loop body"))
            }
            Statement::Leave if !ctx.in_function => {
                err.add_error("leave outside of a function body".to_string())
            }
            Statement::FunctionDefinition(def) => {
                let inner = Context {
                    in_loop_body: false,
                    in_function: true,
                };
                err += check_control_flow(&def.body, inner);
            }
            Statement::ForLoop(for_loop) => {
                let header = Context {
                    in_loop_body: false,
                    ..ctx
                };
                err += check_control_flow(&for_loop.pre, header);
                err += check_control_flow(&for_loop.post, header);
                let body = Context {
                    in_loop_body: true,
                    ..ctx
                };
                err += check_control_flow(&for_loop.body, body);
            }
            Statement::If { body, .. } => err += check_control_flow(body, ctx),
            Statement::Switch(switch) => {
                for case in &switch.cases {
                    err += check_control_flow(&case.body, ctx);
                }
            }
            Statement::Block(inner) => err += check_control_flow(inner, ctx),
            _ => {}
        }
    }

    err
}
