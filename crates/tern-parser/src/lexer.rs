// ===================================================================
// FILE: lexer.rs
//
// DESC: Defines the lexer using the `logos` crate. It scans the
//       source string and produces a stream of tokens, skipping
//       whitespace and `//` line comments.
// ===================================================================

use logos::Logos;

use crate::ParseError;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'a> {
    // Keywords
    #[token("let")]
    Let,
    #[token("def")]
    Def,
    #[token("True")]
    True,
    #[token("False")]
    False,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("=")]
    Equals,
    #[token(",")]
    Comma,

    // Operators
    #[token("+", |lex| lex.slice())]
    #[token("-", |lex| lex.slice())]
    #[token("*", |lex| lex.slice())]
    #[token("/", |lex| lex.slice())]
    Operator(&'a str),

    // Literals and Identifiers
    #[regex("[0-9]+", |lex| lex.slice())]
    Number(&'a str),

    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice())]
    Identifier(&'a str),
}

/// A token together with its byte range in the source.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub start: usize,
    pub end: usize,
}

/// Tokenize the whole input, failing on the first unrecognised character.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(token) => tokens.push(Spanned {
                token,
                start: span.start,
                end: span.end,
            }),
            Err(()) => {
                return Err(ParseError::UnrecognizedInput {
                    text: lexer.slice().to_string(),
                    offset: span.start,
                });
            }
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
