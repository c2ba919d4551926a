// lexer for the intermediate language.

use derive_more::Display;
use logos::Logos;
use std::ops::Range;

use super::ParseError;

#[derive(Logos, Clone, Copy, Debug, Display, Eq, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^*/][^*]*\*+)*/")]
pub enum TokenKind {
    // keywords
    #[token("let")]
    #[display(fmt = "let")]
    Let,
    #[token("function")]
    #[display(fmt = "function")]
    Function,
    #[token("if")]
    #[display(fmt = "if")]
    If,
    #[token("switch")]
    #[display(fmt = "switch")]
    Switch,
    #[token("case")]
    #[display(fmt = "case")]
    Case,
    #[token("default")]
    #[display(fmt = "default")]
    Default,
    #[token("for")]
    #[display(fmt = "for")]
    For,
    #[token("break")]
    #[display(fmt = "break")]
    Break,
    #[token("continue")]
    #[display(fmt = "continue")]
    Continue,
    #[token("leave")]
    #[display(fmt = "leave")]
    Leave,
    #[token("true")]
    #[display(fmt = "true")]
    True,
    #[token("false")]
    #[display(fmt = "false")]
    False,

    // punctuation
    #[token(":=")]
    #[display(fmt = ":=")]
    Gets,
    #[token(":")]
    #[display(fmt = ":")]
    Colon,
    #[token(",")]
    #[display(fmt = ",")]
    Comma,
    #[token("->")]
    #[display(fmt = "->")]
    Arrow,
    #[token("(")]
    #[display(fmt = "(")]
    OpenParen,
    #[token(")")]
    #[display(fmt = ")")]
    CloseParen,
    #[token("{")]
    #[display(fmt = "{{")]
    OpenBrace,
    #[token("}")]
    #[display(fmt = "}}")]
    CloseBrace,

    // everything else
    #[regex("0x[0-9a-fA-F]+|[0-9]+")]
    #[display(fmt = "number")]
    Num,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[display(fmt = "string")]
    Str,
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$.]*")]
    #[display(fmt = "identifier")]
    Id,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>, // byte offsets into the source code
}

// splits the source code into tokens, failing on the first character sequence
// that isn't a token.
pub fn lex(code: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = TokenKind::lexer(code);
    let mut tokens = vec![];

    while let Some(kind) = lexer.next() {
        match kind {
            Ok(kind) => tokens.push(Token {
                kind,
                span: lexer.span(),
            }),
            Err(()) => {
                return Err(ParseError(format!(
                    "lex error: unrecognized input `{}` at offset {}",
                    lexer.slice(),
                    lexer.span().start
                )))
            }
        }
    }

    Ok(tokens)
}
