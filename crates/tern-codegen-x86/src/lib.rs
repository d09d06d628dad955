// ===================================================================
// FILE: lib.rs (tern-codegen-x86 crate)
//
// DESC: Native backend translating TERN IR into raw 32-bit x86
//       machine code. Symbolic names are bound to registers on first
//       use; when all eight are taken one binding is spilled.
// ===================================================================

use tern_ir::{Instruction, Opcode};

pub mod encoding;
pub mod listing;
pub mod regalloc;


pub use listing::disassemble;
pub use regalloc::{Register, RegisterMap, REGISTER_COUNT};

use encoding::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("invalid immediate value for {opcode}: `{operand}`")]
    InvalidImmediateOperand { opcode: Opcode, operand: String },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("unknown register: {0}")]
    UnknownRegister(String),

    #[error("no register bound to `{0}`")]
    UnregisteredName(String),
}

/// Compile an IR sequence into machine code in one go.
pub fn generate(instructions: &[Instruction]) -> Result<Vec<u8>, CodegenError> {
    let mut codegen = CodeGenerator::new();
    codegen.generate(instructions)?;
    Ok(codegen.finish())
}

#[derive(Debug, Default)]
pub struct CodeGenerator {
    registers: RegisterMap,
    code: Encoder,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate instructions strictly in order.
    pub fn generate(&mut self, instructions: &[Instruction]) -> Result<(), CodegenError> {
        for instruction in instructions {
            self.translate(instruction)?;
        }
        tracing::debug!(
            bytes = self.code.len(),
            live = self.registers.len(),
            "generated machine code"
        );
        Ok(())
    }

    pub fn code(&self) -> &[u8] {
        self.code.bytes()
    }

    pub fn finish(self) -> Vec<u8> {
        self.code.into_bytes()
    }

    pub fn registers(&self) -> &RegisterMap {
        &self.registers
    }

    /// The register currently bound to `name`
    pub fn register_of(&self, name: &str) -> Result<Register, CodegenError> {
        self.registers
            .get(name)
            .ok_or_else(|| CodegenError::UnregisteredName(name.to_string()))
    }

    /// Return the register bound to `name`, binding a fresh one if needed.
    pub fn allocate_register(&mut self, name: &str) -> Result<Register, CodegenError> {
        if let Some(reg) = self.registers.get(name) {
            return Ok(reg);
        }

        let reg = match self.registers.take_fresh() {
            Some(reg) => reg,
            None => self.spill_register()?,
        };
        self.registers.bind(name, reg);
        tracing::trace!(name, %reg, "allocated register");
        Ok(reg)
    }

    /// Evict the binding whose name sorts first and push its register.
    ///
    /// This is not a recency policy, and nothing reloads the evicted value:
    /// the next use of that name gets a new register with no defined contents.
    fn spill_register(&mut self) -> Result<Register, CodegenError> {
        let (victim, reg) = self
            .registers
            .evict_smallest()
            .ok_or_else(|| {
                CodegenError::UnsupportedOperation("spill with no live registers".to_string())
            })?;
        tracing::debug!(victim = %victim, %reg, "spilling register");
        self.code.op_ext(GROUP5_RM, EXT_PUSH, reg);
        Ok(reg)
    }

    /// Pop the top of the stack into the register bound to `name`.
    ///
    /// Not used by any lowering rule.
    pub fn reload_register(&mut self, name: &str) -> Result<(), CodegenError> {
        let reg = self.register_of(name)?;
        self.code.op_ext(POP_RM, EXT_POP, reg);
        Ok(())
    }

    fn translate(&mut self, instruction: &Instruction) -> Result<(), CodegenError> {
        tracing::trace!(%instruction, "translating");
        match instruction.opcode {
            Opcode::Add => self.translate_arith(instruction, ADD_RM_R, EXT_ADD),
            Opcode::Sub => self.translate_arith(instruction, SUB_RM_R, EXT_SUB),
            Opcode::Mul => self.translate_mul(instruction),
            Opcode::Div => self.translate_div(instruction),
            Opcode::Load => self.translate_load(instruction),
            Opcode::Store => {
                let src = self.allocate_register(&instruction.src1)?;
                let dest = self.allocate_register(&instruction.dest)?;
                self.code.op_rr(MOV_RM_R, src, dest);
                Ok(())
            }
            // Stack slots are not modelled; the name gets a register on first use.
            Opcode::Alloca => Ok(()),
            Opcode::Return => {
                self.code.op(RET);
                Ok(())
            }
        }
    }

    /// Add and Sub share a shape: `op r/m32, r32` or the `81 /ext id` group form.
    fn translate_arith(&mut self, instruction: &Instruction, opcode: u8, ext: u8) -> Result<(), CodegenError> {
        let dest = self.allocate_register(&instruction.dest)?;

        match &instruction.src2 {
            None => {
                let imm = immediate(instruction)?;
                self.code
                    .op_modrm_imm32(GROUP1_RM_IMM32, modrm(ext, dest.ordinal()), imm);
            }
            Some(src2) => {
                let src1 = self.allocate_register(&instruction.src1)?;
                let src2 = self.allocate_register(src2)?;
                // src1 op= src2
                self.code.op_rr(opcode, src2, src1);
                self.move_if_needed(src1, dest);
            }
        }
        Ok(())
    }

    fn translate_mul(&mut self, instruction: &Instruction) -> Result<(), CodegenError> {
        let dest = self.allocate_register(&instruction.dest)?;

        match &instruction.src2 {
            None => {
                let imm = immediate(instruction)?;
                // dest = dest * imm32
                self.code
                    .op_modrm_imm32(IMUL_R_RM_IMM32, modrm(dest.ordinal(), dest.ordinal()), imm);
            }
            Some(src2) => {
                let src1 = self.allocate_register(&instruction.src1)?;
                let src2 = self.allocate_register(src2)?;
                // src1 *= src2
                self.code.op2_rr(TWO_BYTE, IMUL_R_RM, src1, src2);
                self.move_if_needed(src1, dest);
            }
        }
        Ok(())
    }

    /// `idiv` divides EDX:EAX, so the dividend goes through EAX and EDX is
    /// overwritten by the sign extension.
    fn translate_div(&mut self, instruction: &Instruction) -> Result<(), CodegenError> {
        // Rejected before any allocation, so nothing is emitted.
        let Some(src2) = &instruction.src2 else {
            return Err(CodegenError::UnsupportedOperation(format!(
                "division by immediate value `{}`",
                instruction.src1
            )));
        };

        let dest = self.allocate_register(&instruction.dest)?;
        let src1 = self.allocate_register(&instruction.src1)?;
        let src2 = self.allocate_register(src2)?;

        self.move_if_needed(src1, Register::Eax);
        self.code.op(CDQ);
        self.code.op_ext(GROUP3_RM, EXT_IDIV, src2);
        self.move_if_needed(Register::Eax, dest);
        Ok(())
    }

    fn translate_load(&mut self, instruction: &Instruction) -> Result<(), CodegenError> {
        let dest = self.allocate_register(&instruction.dest)?;

        match parse_integer(&instruction.src1) {
            Some(imm) => self.code.mov_imm32(dest, imm),
            None => {
                let src = self.allocate_register(&instruction.src1)?;
                self.code.op_rr(MOV_R_RM, dest, src);
            }
        }
        Ok(())
    }

    /// `mov to, from` unless they are already the same register.
    fn move_if_needed(&mut self, from: Register, to: Register) {
        if from != to {
            self.code.op_rr(MOV_RM_R, from, to);
        }
    }
}

/// A decimal literal that fits in 32 bits, with an optional sign.
fn parse_integer(text: &str) -> Option<i32> {
    text.parse::<i32>().ok()
}

/// The lone source operand of an immediate-form instruction.
fn immediate(instruction: &Instruction) -> Result<i32, CodegenError> {
    parse_integer(&instruction.src1).ok_or_else(|| CodegenError::InvalidImmediateOperand {
        opcode: instruction.opcode,
        operand: instruction.src1.clone(),
    })
}
