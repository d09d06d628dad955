// ===================================================================
// FILE: regalloc.rs (tern-codegen-x86 crate)
//
// DESC: The eight 32-bit general purpose registers and the map from
//       symbolic IR names to the register currently holding them.
// ===================================================================

use std::collections::BTreeMap;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

use crate::CodegenError;

pub const REGISTER_COUNT: usize = 8;

/// A 32-bit x86 general purpose register. The discriminant is the
/// 3-bit register number used in ModRM and `+rd` encodings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Register {
    Eax = 0,
    Ecx = 1,
    Edx = 2,
    Ebx = 3,
    Esp = 4,
    Ebp = 5,
    Esi = 6,
    Edi = 7,
}

impl Register {
    pub fn ordinal(self) -> u8 {
        self.into()
    }

    /// Look a register up by name, ignoring case.
    pub fn parse(s: &str) -> Result<Self, CodegenError> {
        s.parse::<Self>()
            .map_err(|_| CodegenError::UnknownRegister(s.to_string()))
    }
}

/// Symbolic name -> register bindings.
///
/// Slots are handed out in ordinal order until all eight are taken. After
/// that a slot only becomes free by evicting a binding, and the evicted
/// register is the one given to the next name.
#[derive(Debug, Clone, Default)]
pub struct RegisterMap {
    bindings: BTreeMap<String, Register>,
    next_free: u8,
}

impl RegisterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Register> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind `name` to a register that no other name holds.
    ///
    /// Callers must evict first when the map is full.
    pub(crate) fn bind(&mut self, name: &str, reg: Register) {
        debug_assert!(!self.bindings.values().any(|bound| *bound == reg));
        self.bindings.insert(name.to_string(), reg);
    }

    /// The next never-used slot, if any remain.
    pub(crate) fn take_fresh(&mut self) -> Option<Register> {
        let reg = Register::try_from(self.next_free).ok()?;
        self.next_free += 1;
        Some(reg)
    }

    /// Drop the binding with the lexicographically smallest name.
    pub(crate) fn evict_smallest(&mut self) -> Option<(String, Register)> {
        self.bindings.pop_first()
    }

    /// Current bindings, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, Register)> {
        self.bindings.iter().map(|(name, reg)| (name.as_str(), *reg))
    }
}
