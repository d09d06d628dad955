// ===================================================================
// FILE: lib.rs (tern-ir crate)
//
// DESC: Defines the flat three-address Intermediate Representation
//       for TERN. Operands are symbolic names: decimal literals,
//       `true`/`false`, user identifiers or generated temporaries.
// ===================================================================

use serde::Serialize;
use tern_ast::NodeKind;

pub mod lowering;

#[cfg(test)]
mod tests;

// Re-export main lowering function
pub use lowering::{lower_program, IrGenerator};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::IntoStaticStr,
)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
    Load,
    Store,
    Alloca,
    Return,
}

/// A single three-address instruction.
///
/// `dest` and `src1` are empty when the opcode does not use them
/// (`Alloca` has no sources, `Return` has no operands at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub dest: String,
    pub src1: String,
    pub src2: Option<String>,
}

/// Errors that can occur while lowering a syntax tree to IR
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    #[error("unsupported binary operator `{0}`")]
    UnsupportedOperator(String),

    /// Only literals and identifiers can be lowered as operands
    #[error("cannot lower {kind} as an operand")]
    UnsupportedOperand { kind: NodeKind },
}

impl Opcode {
    /// Map a source operator to its arithmetic opcode
    pub fn from_operator(op: &str) -> Result<Self, LoweringError> {
        match op {
            "+" => Ok(Opcode::Add),
            "-" => Ok(Opcode::Sub),
            "*" => Ok(Opcode::Mul),
            "/" => Ok(Opcode::Div),
            _ => Err(LoweringError::UnsupportedOperator(op.to_string())),
        }
    }
}

impl Instruction {
    pub fn new(opcode: Opcode, dest: &str, src1: &str, src2: Option<&str>) -> Self {
        Instruction {
            opcode,
            dest: dest.to_string(),
            src1: src1.to_string(),
            src2: src2.map(str::to_string),
        }
    }

    /// `dest = src1 <op> src2`
    pub fn binary(opcode: Opcode, dest: &str, src1: &str, src2: &str) -> Self {
        Self::new(opcode, dest, src1, Some(src2))
    }

    pub fn load(dest: &str, src: &str) -> Self {
        Self::new(Opcode::Load, dest, src, None)
    }

    pub fn store(dest: &str, src: &str) -> Self {
        Self::new(Opcode::Store, dest, src, None)
    }

    pub fn alloca(name: &str) -> Self {
        Self::new(Opcode::Alloca, name, "", None)
    }

    pub fn ret() -> Self {
        Self::new(Opcode::Return, "", "", None)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic: &'static str = self.opcode.into();
        f.write_str(mnemonic)?;
        let operands = [Some(self.dest.as_str()), Some(self.src1.as_str()), self.src2.as_deref()];
        let mut first = true;
        for operand in operands.into_iter().flatten().filter(|o| !o.is_empty()) {
            f.write_str(if first { " " } else { ", " })?;
            f.write_str(operand)?;
            first = false;
        }
        Ok(())
    }
}
