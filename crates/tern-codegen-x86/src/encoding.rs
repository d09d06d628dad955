// ===================================================================
// FILE: encoding.rs (tern-codegen-x86 crate)
//
// DESC: Byte-level instruction forms. Every operand is a register
//       (ModRM mod = 0b11); there is no memory addressing.
// ===================================================================

use crate::regalloc::Register;

// Opcodes
pub const ADD_RM_R: u8 = 0x01;
pub const SUB_RM_R: u8 = 0x29;
pub const MOV_RM_R: u8 = 0x89;
pub const MOV_R_RM: u8 = 0x8B;
pub const TWO_BYTE: u8 = 0x0F;
pub const IMUL_R_RM: u8 = 0xAF;
pub const IMUL_R_RM_IMM32: u8 = 0x69;
pub const GROUP1_RM_IMM32: u8 = 0x81;
pub const MOV_R_IMM32: u8 = 0xB8;
pub const CDQ: u8 = 0x99;
pub const GROUP3_RM: u8 = 0xF7;
pub const GROUP5_RM: u8 = 0xFF;
pub const POP_RM: u8 = 0x8F;
pub const RET: u8 = 0xC3;

// Opcode extensions (the ModRM reg field of group opcodes)
pub const EXT_ADD: u8 = 0;
pub const EXT_SUB: u8 = 5;
pub const EXT_IDIV: u8 = 7;
pub const EXT_PUSH: u8 = 6;
pub const EXT_POP: u8 = 0;

/// Register-direct ModRM: `11 reg rm`.
pub fn modrm(reg: u8, rm: u8) -> u8 {
    0xC0 | ((reg & 0b111) << 3) | (rm & 0b111)
}

/// Append-only machine code buffer
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    code: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-byte form: opcode only.
    pub fn op(&mut self, opcode: u8) {
        self.code.push(opcode);
    }

    /// Two-byte form: opcode, ModRM.
    pub fn op_rr(&mut self, opcode: u8, reg: Register, rm: Register) {
        self.code.extend_from_slice(&[opcode, modrm(reg.ordinal(), rm.ordinal())]);
    }

    /// Two-byte form for group opcodes, where ModRM.reg is an opcode extension.
    pub fn op_ext(&mut self, opcode: u8, ext: u8, rm: Register) {
        self.code.extend_from_slice(&[opcode, modrm(ext, rm.ordinal())]);
    }

    /// Three-byte form: two opcode bytes, ModRM.
    pub fn op2_rr(&mut self, opcode1: u8, opcode2: u8, reg: Register, rm: Register) {
        self.code
            .extend_from_slice(&[opcode1, opcode2, modrm(reg.ordinal(), rm.ordinal())]);
    }

    /// Immediate form: opcode, ModRM, little-endian imm32.
    pub fn op_modrm_imm32(&mut self, opcode: u8, modrm: u8, imm: i32) {
        self.code.extend_from_slice(&[opcode, modrm]);
        self.code.extend_from_slice(&imm.to_le_bytes());
    }

    /// `B8+rd id`: the register lives in the opcode, no ModRM.
    pub fn mov_imm32(&mut self, dest: Register, imm: i32) {
        self.code.push(MOV_R_IMM32 + dest.ordinal());
        self.code.extend_from_slice(&imm.to_le_bytes());
    }

    pub fn bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.code
    }
}
