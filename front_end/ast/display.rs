// pretty-printing of the AST in the concrete syntax accepted by the parser.
//
// the output is canonical: printing, parsing and printing again yields the same
// text, which is what the optimizer tests compare.

use super::*;

use std::fmt::{Display, Formatter, Result as FmtResult};

const INDENT: &str = "    ";

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write_block(f, self, 0)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write_statement(f, self, 0)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Expression::Literal(literal) => write!(f, "{literal}"),
            Expression::Identifier(name) => write!(f, "{name}"),
            Expression::FunctionCall { function, args } => {
                write!(f, "{function}(")?;
                write_separated(f, args)?;
                write!(f, ")")
            }
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            LiteralKind::String => write!(f, "\"{}\"", self.value)?,
            LiteralKind::Number | LiteralKind::Boolean => write!(f, "{}", self.value)?,
        }
        if let Some(typ) = &self.typ {
            write!(f, ":{typ}")?;
        }
        Ok(())
    }
}

impl Display for TypedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.typ {
            Some(typ) => write!(f, "{}:{typ}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> FmtResult {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_indent(f: &mut Formatter<'_>, level: usize) -> FmtResult {
    for _ in 0..level {
        f.write_str(INDENT)?;
    }
    Ok(())
}

// the opening brace goes on the current line, the closing brace on its own line
// at `level`.
fn write_block(f: &mut Formatter<'_>, block: &Block, level: usize) -> FmtResult {
    if block.statements.is_empty() {
        return write!(f, "{{ }}");
    }

    writeln!(f, "{{")?;
    for statement in &block.statements {
        write_indent(f, level + 1)?;
        write_statement(f, statement, level + 1)?;
        writeln!(f)?;
    }
    write_indent(f, level)?;
    write!(f, "}}")
}

// writes a statement whose first line is already indented to `level`.
fn write_statement(f: &mut Formatter<'_>, statement: &Statement, level: usize) -> FmtResult {
    use Statement::*;

    match statement {
        ExpressionStatement(expression) => write!(f, "{expression}"),
        Assignment { targets, value } => {
            write_separated(f, targets)?;
            write!(f, " := {value}")
        }
        VariableDeclaration(decl) => {
            write!(f, "let ")?;
            write_separated(f, &decl.variables)?;
            match &decl.value {
                Some(value) => write!(f, " := {value}"),
                None => Ok(()),
            }
        }
        FunctionDefinition(def) => {
            write!(f, "function {}(", def.name)?;
            write_separated(f, &def.params)?;
            write!(f, ")")?;
            if !def.returns.is_empty() {
                write!(f, " -> ")?;
                write_separated(f, &def.returns)?;
            }
            write!(f, " ")?;
            write_block(f, &def.body, level)
        }
        If { condition, body } => {
            write!(f, "if {condition} ")?;
            write_block(f, body, level)
        }
        Switch(switch) => {
            write!(f, "switch {}", switch.expression)?;
            for case in &switch.cases {
                writeln!(f)?;
                write_indent(f, level)?;
                match &case.value {
                    Some(value) => write!(f, "case {value} ")?,
                    None => write!(f, "default ")?,
                }
                write_block(f, &case.body, level)?;
            }
            Ok(())
        }
        ForLoop(for_loop) => {
            write!(f, "for ")?;
            write_block(f, &for_loop.pre, level)?;
            write!(f, " {} ", for_loop.condition)?;
            write_block(f, &for_loop.post, level)?;
            write!(f, " ")?;
            write_block(f, &for_loop.body, level)
        }
        Break => write!(f, "break"),
        Continue => write!(f, "continue"),
        Leave => write!(f, "leave"),
        Block(block) => write_block(f, block, level),
    }
}
