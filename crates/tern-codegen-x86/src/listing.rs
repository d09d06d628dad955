// ===================================================================
// FILE: listing.rs (tern-codegen-x86 crate)
//
// DESC: Diagnostic disassembly of generated code. Decodes exactly the
//       instruction forms the encoder produces; anything else is
//       shown as a raw `db` byte.
// ===================================================================

use std::fmt;

use crate::encoding::*;
use crate::regalloc::Register;

/// One decoded instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub offset: usize,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02x}", b)).collect();
        write!(f, "{:04x}  {:<20} {}", self.offset, hex.join(" "), self.text)
    }
}

pub fn disassemble(code: &[u8]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        let (len, text) = decode(&code[offset..])
            .unwrap_or_else(|| (1, format!("db 0x{:02x}", code[offset])));
        lines.push(Line {
            offset,
            bytes: code[offset..offset + len].to_vec(),
            text,
        });
        offset += len;
    }
    lines
}

fn register(bits: u8) -> Option<Register> {
    Register::try_from(bits & 0b111).ok()
}

/// Split a register-direct ModRM byte into its reg field and rm register.
fn register_direct(byte: u8) -> Option<(u8, Register)> {
    if byte & 0xC0 != 0xC0 {
        return None;
    }
    Some(((byte >> 3) & 0b111, register(byte)?))
}

fn imm32(bytes: &[u8]) -> Option<i32> {
    let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(i32::from_le_bytes(raw))
}

/// Decode the instruction at the start of `code` into (length, text).
fn decode(code: &[u8]) -> Option<(usize, String)> {
    let opcode = *code.first()?;
    match opcode {
        RET => Some((1, "ret".to_string())),
        CDQ => Some((1, "cdq".to_string())),
        op if (MOV_R_IMM32..MOV_R_IMM32 + 8).contains(&op) => {
            let dest = register(op - MOV_R_IMM32)?;
            Some((5, format!("mov {}, {}", dest, imm32(&code[1..])?)))
        }
        ADD_RM_R | SUB_RM_R | MOV_RM_R => {
            let (reg, rm) = register_direct(*code.get(1)?)?;
            let mnemonic = match opcode {
                ADD_RM_R => "add",
                SUB_RM_R => "sub",
                _ => "mov",
            };
            Some((2, format!("{} {}, {}", mnemonic, rm, register(reg)?)))
        }
        MOV_R_RM => {
            let (reg, rm) = register_direct(*code.get(1)?)?;
            Some((2, format!("mov {}, {}", register(reg)?, rm)))
        }
        TWO_BYTE if code.get(1) == Some(&IMUL_R_RM) => {
            let (reg, rm) = register_direct(*code.get(2)?)?;
            Some((3, format!("imul {}, {}", register(reg)?, rm)))
        }
        IMUL_R_RM_IMM32 => {
            let (reg, rm) = register_direct(*code.get(1)?)?;
            let imm = imm32(code.get(2..)?)?;
            Some((6, format!("imul {}, {}, {}", register(reg)?, rm, imm)))
        }
        GROUP1_RM_IMM32 => {
            let (ext, rm) = register_direct(*code.get(1)?)?;
            let mnemonic = match ext {
                EXT_ADD => "add",
                EXT_SUB => "sub",
                _ => return None,
            };
            let imm = imm32(code.get(2..)?)?;
            Some((6, format!("{} {}, {}", mnemonic, rm, imm)))
        }
        GROUP3_RM => match register_direct(*code.get(1)?)? {
            (EXT_IDIV, rm) => Some((2, format!("idiv {}", rm))),
            _ => None,
        },
        GROUP5_RM => match register_direct(*code.get(1)?)? {
            (EXT_PUSH, rm) => Some((2, format!("push {}", rm))),
            _ => None,
        },
        POP_RM => match register_direct(*code.get(1)?)? {
            (EXT_POP, rm) => Some((2, format!("pop {}", rm))),
            _ => None,
        },
        _ => None,
    }
}
