// ===================================================================
// FILE: lib.rs (tern-parser crate)
//
// DESC: Front end for TERN: a `logos` lexer and a recursive-descent
//       parser producing a `tern_ast::Program`.
// ===================================================================

pub mod lexer;
pub mod parser;


// Re-export for convenience
pub use lexer::{tokenize, Spanned, Token};
pub use parser::{parse_program, Parser};
pub use tern_ast::*;

/// Errors raised while turning source text into a syntax tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unrecognized input `{text}` at offset {offset}")]
    UnrecognizedInput { text: String, offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: &'static str },

    #[error("integer literal `{text}` at offset {offset} does not fit in 32 bits")]
    IntegerOverflow { text: String, offset: usize },
}
