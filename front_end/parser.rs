// ll(1) parser for the intermediate language.

use derive_more::Display;

use super::*;
use TokenKind::*;

// SECTION: interface

pub fn parse(code: &str) -> Result<Block, ParseError> {
    let mut parser = Parser::new(code)?;
    let program = block_r(&mut parser)?;
    if parser.end() {
        Ok(program)
    } else {
        parser.error_next("expected end of input after the program block")
    }
}

// A parse error with explanatory message.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct ParseError(pub String);
impl std::error::Error for ParseError {}

// SECTION: parser functionality

#[derive(Clone, Debug)]
struct Parser<'a> {
    code: &'a str,      // the source code being parsed
    tokens: Vec<Token>, // the token stream
    pos: usize,         // the position in the token stream
}

// utility functions for traversing the token stream and creating error
// messages.
impl<'a> Parser<'a> {
    // always use this to create new Parsers.
    fn new(code: &'a str) -> Result<Self, ParseError> {
        let tokens = lex(code)?;
        if tokens.is_empty() {
            Err(ParseError("empty token stream".to_string()))
        } else {
            Ok(Parser {
                code,
                tokens,
                pos: 0,
            })
        }
    }

    // if the next token has the given kind advances the iterator and returns true,
    // otherwise returns false.
    fn eat(&mut self, kind: TokenKind) -> bool {
        match self.peek() {
            Some(k) if k == kind => {
                self.next();
                true
            }
            _ => false,
        }
    }

    // returns an Ok or Err result depending on whether the next token has the given
    // kind, advancing the iterator on an Ok result.
    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            self.error_next(&format!("expected `{kind}`"))
        }
    }

    // advances the iterator and returns the next token in the stream, or None if
    // there are no more tokens.
    fn next(&mut self) -> Option<TokenKind> {
        if !self.end() {
            self.pos += 1;
            Some(self.tokens[self.pos - 1].kind)
        } else {
            None
        }
    }

    // returns the next token (if it exists) without advancing the iterator.
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    // returns the token after the next one without advancing the iterator.
    fn peek_second(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| t.kind)
    }

    // returns whether the next token has the given kind, without advancing the
    // iterator.
    fn next_is(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    // returns whether the next token is one of the given kinds.
    fn next_is_one_of(&self, kinds: &[TokenKind]) -> bool {
        matches!(self.peek(), Some(k) if kinds.contains(&k))
    }

    // returns whether we're at the end of the token stream.
    fn end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // returns the lexeme of the token immediately prior to the current token.
    fn slice_prev(&self) -> &str {
        &self.code[self.tokens[self.pos - 1].span.clone()]
    }

    // returns a parse error knowing that the next token to be inspected causes an
    // error (based on a call to peek(), next_is(), etc).
    fn error_next<T>(&self, msg: &str) -> Result<T, ParseError> {
        // handle the case where we're at the end of the token stream.
        if self.pos >= self.tokens.len() {
            Err(ParseError(format!(
                "parse error: unexpected end of input ({msg})\n"
            )))
        } else {
            self.error(self.pos, msg)
        }
    }

    // constructs a parse error given the position of the error-causing token in the
    // token stream.
    fn error<T>(&self, pos: usize, msg: &str) -> Result<T, ParseError> {
        // the position of the error-causing lexeme in the source code.
        let span = &self.tokens[pos].span;

        // the row number and the index of the start of the row containing the
        // error-causing token.
        let (row, row_start) = {
            let mut row = 0;
            let mut row_start = 0;
            for (idx, _) in self.code.match_indices('\n') {
                if idx > span.start {
                    break;
                }
                row += 1;
                row_start = idx + 1;
            }
            (row, row_start)
        };

        // the column where the error-causing lexeme starts.
        let col = span.start - row_start;

        // the line containing the error-causing lexeme.
        let line = self.code.lines().nth(row).unwrap_or_default();

        Err(ParseError(format!(
            "parse error in line {row}, column {col}\n{line}\n{:width$}^\n{msg}\n",
            "",
            width = col
        )))
    }
}

// SECTION: parsing functions

// the function names come from the production rules of the LL(1) grammar.

// FIRST(stmt)
const STMT_FIRST: [TokenKind; 10] = [
    OpenBrace, Let, Function, If, Switch, For, Break, Continue, Leave, Id,
];

// FIRST(exp)
const EXP_FIRST: [TokenKind; 5] = [Num, Str, True, False, Id];

// sequence of statements.
fn block_r(parser: &mut Parser) -> Result<Block, ParseError> {
    parser.expect(OpenBrace)?;
    let mut statements = vec![];

    while parser.next_is_one_of(&STMT_FIRST) {
        statements.push(stmt_r(parser)?);
    }

    parser.expect(CloseBrace)?;

    Ok(Block { statements })
}

// statement.
fn stmt_r(parser: &mut Parser) -> Result<Statement, ParseError> {
    if parser.next_is(OpenBrace) {
        Ok(Statement::Block(block_r(parser)?))
    } else if parser.next_is(Let) {
        let_r(parser)
    } else if parser.next_is(Function) {
        fundef_r(parser)
    } else if parser.eat(If) {
        let condition = exp_r(parser)?;
        let body = block_r(parser)?;

        Ok(Statement::If { condition, body })
    } else if parser.next_is(Switch) {
        switch_r(parser)
    } else if parser.next_is(For) {
        loop_r(parser)
    } else if parser.eat(Break) {
        Ok(Statement::Break)
    } else if parser.eat(Continue) {
        Ok(Statement::Continue)
    } else if parser.eat(Leave) {
        Ok(Statement::Leave)
    } else if parser.next_is(Id) {
        assign_or_call_r(parser)
    } else {
        parser.error_next("expected: OpenBrace, Let, Function, If, Switch, For, Break, Continue, Leave, Id")
    }
}

// variable declaration and possibly initialization.
fn let_r(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect(Let)?;
    let variables = typed_names_r(parser)?;

    let mut value = None;
    if parser.eat(Gets) {
        value = Some(exp_r(parser)?);
    }

    Ok(Statement::VariableDeclaration(VariableDeclaration {
        variables,
        value,
    }))
}

// function definition.
fn fundef_r(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect(Function)?;
    parser.expect(Id)?;
    let name = parser.slice_prev().to_string();

    parser.expect(OpenParen)?;
    let mut params = vec![];
    if parser.next_is(Id) {
        params = typed_names_r(parser)?;
    }
    parser.expect(CloseParen)?;

    let mut returns = vec![];
    if parser.eat(Arrow) {
        returns = typed_names_r(parser)?;
    }

    let body = block_r(parser)?;

    Ok(Statement::FunctionDefinition(FunctionDefinition {
        name,
        params,
        returns,
        body,
    }))
}

// switch statement.
fn switch_r(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect(Switch)?;
    let expression = exp_r(parser)?;
    let mut cases = vec![];

    while parser.eat(Case) {
        let value = literal_r(parser)?;
        let body = block_r(parser)?;
        cases.push(ast::Case {
            value: Some(value),
            body,
        });
    }

    if parser.eat(Default) {
        let body = block_r(parser)?;
        cases.push(ast::Case { value: None, body });
    }

    if cases.is_empty() {
        return parser.error_next("switch_r: expected: Case, Default");
    }

    Ok(Statement::Switch(ast::Switch { expression, cases }))
}

// for loop.
fn loop_r(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect(For)?;
    let pre = block_r(parser)?;
    let condition = exp_r(parser)?;
    let post = block_r(parser)?;
    let body = block_r(parser)?;

    Ok(Statement::ForLoop(ForLoop {
        pre,
        condition,
        post,
        body,
    }))
}

// assignment or call statement.
fn assign_or_call_r(parser: &mut Parser) -> Result<Statement, ParseError> {
    if parser.peek_second() == Some(OpenParen) {
        return Ok(Statement::ExpressionStatement(exp_r(parser)?));
    }

    let mut targets = vec![];
    loop {
        parser.expect(Id)?;
        targets.push(parser.slice_prev().to_string());

        if !parser.eat(Comma) {
            break;
        }
    }

    if !parser.eat(Gets) {
        return parser.error_next("assign_or_call_r: expected: Gets, OpenParen");
    }

    Ok(Statement::Assignment {
        targets,
        value: exp_r(parser)?,
    })
}

// series of names with optional types.
fn typed_names_r(parser: &mut Parser) -> Result<Vec<TypedName>, ParseError> {
    let mut names = vec![];
    loop {
        parser.expect(Id)?;
        let name = parser.slice_prev().to_string();
        names.push(TypedName {
            name,
            typ: type_r(parser)?,
        });

        if !parser.eat(Comma) {
            break;
        }
    }

    Ok(names)
}

// optional type annotation.
fn type_r(parser: &mut Parser) -> Result<Option<String>, ParseError> {
    if parser.eat(Colon) {
        parser.expect(Id)?;
        Ok(Some(parser.slice_prev().to_string()))
    } else {
        Ok(None)
    }
}

// expression.
fn exp_r(parser: &mut Parser) -> Result<Expression, ParseError> {
    if parser.eat(Id) {
        let name = parser.slice_prev().to_string();
        if parser.eat(OpenParen) {
            let mut args = vec![];
            if parser.next_is_one_of(&EXP_FIRST) {
                args = args_r(parser)?;
            }
            parser.expect(CloseParen)?;

            Ok(Expression::FunctionCall {
                function: name,
                args,
            })
        } else {
            Ok(Expression::Identifier(name))
        }
    } else if parser.next_is_one_of(&[Num, Str, True, False]) {
        Ok(Expression::Literal(literal_r(parser)?))
    } else {
        parser.error_next("exp_r: expected: Num, Str, True, False, Id")
    }
}

// call arguments.
fn args_r(parser: &mut Parser) -> Result<Vec<Expression>, ParseError> {
    let mut args = vec![exp_r(parser)?];

    while parser.eat(Comma) {
        args.push(exp_r(parser)?);
    }

    Ok(args)
}

// literal with an optional type.
fn literal_r(parser: &mut Parser) -> Result<Literal, ParseError> {
    let (kind, value) = if parser.eat(Num) {
        (LiteralKind::Number, parser.slice_prev().to_string())
    } else if parser.eat(Str) {
        let quoted = parser.slice_prev();
        (LiteralKind::String, quoted[1..quoted.len() - 1].to_string())
    } else if parser.eat(True) || parser.eat(False) {
        (LiteralKind::Boolean, parser.slice_prev().to_string())
    } else {
        return parser.error_next("literal_r: expected: Num, Str, True, False");
    };

    Ok(Literal {
        kind,
        value,
        typ: type_r(parser)?,
    })
}
