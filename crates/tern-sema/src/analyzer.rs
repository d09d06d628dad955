// ===================================================================
// FILE: analyzer.rs (tern-sema crate)
//
// DESC: The one-pass semantic analyzer. Resolves identifiers against
//       the scoped symbol table and checks the shallow shape rules of
//       the language. It never mutates the tree.
// ===================================================================

use tern_ast::{Node, NodeKind, Program};

use crate::symbol_table::{DataType, Scope, SymbolKind, SymbolTable};
use crate::{Diagnostic, Side, SymbolError};

/// Result of analyzing a whole program
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Recoverable errors, in the order they were found
    pub diagnostics: Vec<Diagnostic>,
    /// Top-level declarations
    pub globals: Scope,
    /// Parameters and locals of every function, as they were when its scope closed
    pub functions: Vec<(String, Scope)>,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The closed scope of the first function named `name`
    pub fn function_scope(&self, name: &str) -> Option<&Scope> {
        self.functions
            .iter()
            .find(|(function, _)| function == name)
            .map(|(_, scope)| scope)
    }
}

pub struct SemanticAnalyzer {
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    functions: Vec<(String, Scope)>,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            diagnostics: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Analyze a program inside a fresh global scope.
    ///
    /// Only a broken scope discipline is fatal; everything else ends up in
    /// [`Analysis::diagnostics`].
    pub fn analyze(mut self, program: &Program) -> Result<Analysis, SymbolError> {
        self.table.enter_scope();
        for item in &program.items {
            self.visit(item)?;
        }
        let globals = self.table.exit_scope()?;

        tracing::debug!(
            diagnostics = self.diagnostics.len(),
            functions = self.functions.len(),
            "semantic analysis finished"
        );
        Ok(Analysis {
            diagnostics: self.diagnostics,
            globals,
            functions: self.functions,
        })
    }

    /// Analyze a single node against the current table state.
    pub fn analyze_node(&mut self, node: &Node) -> Result<(), SymbolError> {
        self.visit(node)
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "semantic error");
        self.diagnostics.push(diagnostic);
    }

    /// Insert a symbol, turning a duplicate into a diagnostic.
    /// Returns whether the symbol was declared.
    fn declare(&mut self, name: &str, kind: SymbolKind, ty: DataType) -> Result<bool, SymbolError> {
        match self.table.insert(name, kind, ty) {
            Ok(()) => Ok(true),
            Err(SymbolError::DuplicateSymbol { name }) => {
                self.report(Diagnostic::DuplicateSymbol { name });
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn visit(&mut self, node: &Node) -> Result<(), SymbolError> {
        match node {
            Node::Number(_) | Node::Boolean(_) => Ok(()),
            Node::Identifier(name) => {
                if self.table.lookup(name).is_err() {
                    self.report(Diagnostic::UndeclaredIdentifier {
                        name: name.to_string(),
                    });
                }
                Ok(())
            }
            Node::BinaryOp { left, right, .. } => self.visit_binary(left, right),
            Node::Assignment { target, value } => {
                self.visit(target)?;
                self.visit(value)?;
                if target.kind() != NodeKind::Identifier {
                    self.report(Diagnostic::InvalidAssignmentTarget {
                        found: target.kind(),
                    });
                }
                Ok(())
            }
            Node::Let { target, value } => self.visit_let(target, value),
            Node::Function { name, params, body } => self.visit_function(name, params, body),
        }
    }

    fn visit_binary(&mut self, left: &Node, right: &Node) -> Result<(), SymbolError> {
        self.visit(left)?;
        self.visit(right)?;

        for (side, operand) in [(Side::Left, left), (Side::Right, right)] {
            if !matches!(operand.kind(), NodeKind::Identifier | NodeKind::Number) {
                self.report(Diagnostic::InvalidOperand {
                    side,
                    found: operand.kind(),
                });
            }
        }
        Ok(())
    }

    fn visit_let(&mut self, target: &Node, value: &Node) -> Result<(), SymbolError> {
        let Some(name) = target.as_identifier() else {
            self.report(Diagnostic::InvalidLetTarget {
                found: target.kind(),
            });
            return Ok(());
        };

        let ty = match value.kind() {
            NodeKind::Number => DataType::Int,
            NodeKind::Boolean => DataType::Bool,
            NodeKind::Identifier => {
                self.visit(value)?;
                DataType::Unknown
            }
            NodeKind::BinaryOp => DataType::Unknown,
            found => {
                self.report(Diagnostic::UnsupportedDeclarationType {
                    name: name.to_string(),
                    found,
                });
                return Ok(());
            }
        };

        if self.declare(name, SymbolKind::Variable, ty)? {
            self.visit(value)?;
        }
        Ok(())
    }

    fn visit_function(&mut self, name: &str, params: &[Node], body: &[Node]) -> Result<(), SymbolError> {
        self.table.enter_scope();
        for param in params {
            let Some(param_name) = param.as_identifier() else {
                self.report(Diagnostic::InvalidParameter {
                    function: name.to_string(),
                    found: param.kind(),
                });
                let scope = self.table.exit_scope()?;
                self.functions.push((name.to_string(), scope));
                return Ok(());
            };
            self.declare(param_name, SymbolKind::Parameter, DataType::Int)?;
        }

        for statement in body {
            self.visit(statement)?;
        }

        let scope = self.table.exit_scope()?;
        tracing::trace!(function = name, symbols = scope.len(), "analyzed function");
        self.functions.push((name.to_string(), scope));
        Ok(())
    }
}
