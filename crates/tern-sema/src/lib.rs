// ===================================================================
// FILE: lib.rs (tern-sema crate)
//
// DESC: Scope-aware semantic checking for TERN: the scoped symbol
//       table and the single-pass analyzer that populates it.
// ===================================================================

use tern_ast::NodeKind;

pub mod analyzer;
pub mod symbol_table;

#[cfg(test)]
mod tests;

pub use analyzer::{Analysis, SemanticAnalyzer};
pub use symbol_table::{DataType, Scope, Symbol, SymbolKind, SymbolTable};

/// Failures of the symbol table itself
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// `exit_scope` with nothing left to pop, or a declaration with no scope open
    #[error("no scope to exit")]
    ScopeUnderflow,

    #[error("symbol '{name}' already declared in the current scope")]
    DuplicateSymbol { name: String },

    #[error("symbol '{name}' not found")]
    NotFound { name: String },
}

/// Which side of a binary expression a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("Left"),
            Side::Right => f.write_str("Right"),
        }
    }
}

/// Recoverable semantic errors. The analyzer records them and keeps walking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("identifier '{name}' not found")]
    UndeclaredIdentifier { name: String },

    #[error("{side} side of binary operator is not a number or identifier (found {found})")]
    InvalidOperand { side: Side, found: NodeKind },

    #[error("left side of assignment must be an identifier (found {found})")]
    InvalidAssignmentTarget { found: NodeKind },

    #[error("left side of let statement must be an identifier (found {found})")]
    InvalidLetTarget { found: NodeKind },

    #[error("unsupported data type in let statement for '{name}' (found {found})")]
    UnsupportedDeclarationType { name: String, found: NodeKind },

    #[error("parameters of function '{function}' must be identifiers (found {found})")]
    InvalidParameter { function: String, found: NodeKind },

    #[error("symbol '{name}' already declared in the current scope")]
    DuplicateSymbol { name: String },
}
