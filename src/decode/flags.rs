//! EFLAGS decoding

use crate::core::types::FlagsState;

pub const FLAG_CF: u32 = 1 << 0;
pub const FLAG_PF: u32 = 1 << 2;
pub const FLAG_AF: u32 = 1 << 4;
pub const FLAG_ZF: u32 = 1 << 6;
pub const FLAG_SF: u32 = 1 << 7;
pub const FLAG_TF: u32 = 1 << 8;
pub const FLAG_IF: u32 = 1 << 9;
pub const FLAG_DF: u32 = 1 << 10;
pub const FLAG_OF: u32 = 1 << 11;

/// Decodes the named status and control bits of an EFLAGS value
pub fn decode_eflags(value: u32) -> FlagsState {
    let set = |mask: u32| value & mask != 0;

    FlagsState {
        value,
        carry: set(FLAG_CF),
        parity: set(FLAG_PF),
        adjust: set(FLAG_AF),
        zero: set(FLAG_ZF),
        sign: set(FLAG_SF),
        trap: set(FLAG_TF),
        interrupt: set(FLAG_IF),
        direction: set(FLAG_DF),
        overflow: set(FLAG_OF),
    }
}
