// ===================================================================
// FILE: lib.rs (ternc crate)
//
// DESC: The compile pipeline: parse, analyze, lower to IR and
//       generate x86 machine code. The binary is a thin CLI over this.
// ===================================================================

use tern_ast::Program;
use tern_codegen_x86::CodegenError;
use tern_ir::{Instruction, LoweringError};
use tern_parser::ParseError;
use tern_sema::{Analysis, Diagnostic, SemanticAnalyzer, SymbolError};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("symbol table error: {0}")]
    Symbol(#[from] SymbolError),

    /// Semantic diagnostics stopped the compile before lowering.
    #[error("{} semantic error(s)", .0.len())]
    Semantic(Vec<Diagnostic>),

    #[error("lowering error: {0}")]
    Lowering(#[from] LoweringError),

    #[error("codegen error: {0}")]
    Codegen(#[from] CodegenError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Lower and generate code even when analysis reported diagnostics.
    pub keep_going: bool,
}

/// Everything one compile produced
#[derive(Debug)]
pub struct Compilation<'a> {
    pub program: Program<'a>,
    pub analysis: Analysis,
    pub ir: Vec<Instruction>,
    pub code: Vec<u8>,
}

impl Compilation<'_> {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.analysis.diagnostics
    }
}

/// Compile `source`, refusing to lower a program with semantic errors.
pub fn compile(source: &str) -> Result<Compilation<'_>, CompileError> {
    compile_with(source, CompileOptions::default())
}

pub fn compile_with(source: &str, options: CompileOptions) -> Result<Compilation<'_>, CompileError> {
    let program = tern_parser::parse_program(source)?;
    tracing::info!(items = program.items.len(), "parsed program");

    let analysis = SemanticAnalyzer::new().analyze(&program)?;
    if !analysis.is_ok() {
        if !options.keep_going {
            return Err(CompileError::Semantic(analysis.diagnostics));
        }
        tracing::warn!(
            count = analysis.diagnostics.len(),
            "continuing past semantic errors"
        );
    }

    let ir = tern_ir::lower_program(&program)?;
    tracing::info!(instructions = ir.len(), "lowered to IR");

    let code = tern_codegen_x86::generate(&ir)?;
    tracing::info!(bytes = code.len(), "generated machine code");

    Ok(Compilation {
        program,
        analysis,
        ir,
        code,
    })
}

/// Space-separated lowercase hex, sixteen bytes per line.
pub fn hex_dump(code: &[u8]) -> String {
    code.chunks(16)
        .map(|chunk| {
            chunk
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
