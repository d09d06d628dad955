// ===================================================================
// FILE: symbol_table.rs (tern-sema crate)
//
// DESC: A stack of scopes mapping names to symbols. The top of the
//       stack is the current scope; lookups walk it innermost first.
// ===================================================================

use indexmap::IndexMap;

use crate::SymbolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
}

/// Declared type of a symbol. Inferred from the initializer, never unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Bool,
    Unknown,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Bool => "bool",
            DataType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: DataType,
}

/// Insertion-ordered, unique by name.
pub type Scope = IndexMap<String, Symbol>;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        tracing::trace!(depth = self.scopes.len(), "entered scope");
    }

    pub fn exit_scope(&mut self) -> Result<Scope, SymbolError> {
        let scope = self.scopes.pop().ok_or(SymbolError::ScopeUnderflow)?;
        tracing::trace!(depth = self.scopes.len(), symbols = scope.len(), "exited scope");
        Ok(scope)
    }

    /// Declare `name` in the current scope. Outer declarations may be shadowed.
    pub fn insert(&mut self, name: &str, kind: SymbolKind, ty: DataType) -> Result<(), SymbolError> {
        let scope = self.scopes.last_mut().ok_or(SymbolError::ScopeUnderflow)?;
        if scope.contains_key(name) {
            return Err(SymbolError::DuplicateSymbol {
                name: name.to_string(),
            });
        }
        scope.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                kind,
                ty,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Symbol, SymbolError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| SymbolError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn current_scope(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
