//! DR7 debug-control register decoding

use crate::core::types::{BreakpointCondition, BreakpointSlot, DebugRegisters};

/// Number of hardware breakpoint slots
pub const BREAKPOINT_SLOTS: usize = 4;

/// Maps the 2-bit R/W field to a trigger condition
pub fn decode_condition(bits: u8) -> BreakpointCondition {
    match bits & 0x3 {
        0 => BreakpointCondition::Execute,
        1 => BreakpointCondition::Write,
        2 => BreakpointCondition::Io,
        _ => BreakpointCondition::ReadWrite,
    }
}

/// Maps the 2-bit LEN field to a byte length
///
/// The hardware encodes 8 bytes as `2` and 4 bytes as `3`.
pub fn decode_length(bits: u8) -> u8 {
    match bits & 0x3 {
        0 => 1,
        1 => 2,
        2 => 8,
        _ => 4,
    }
}

/// Decodes breakpoint slot `index` (0..=3) from a DR7 value
pub fn decode_slot(dr7: u64, index: usize) -> BreakpointSlot {
    debug_assert!(index < BREAKPOINT_SLOTS);
    let index = index % BREAKPOINT_SLOTS;
    let enable_shift = 2 * index;
    let control_shift = 16 + 4 * index;

    BreakpointSlot {
        index: index as u8,
        enabled: (dr7 >> enable_shift) & 1 != 0,
        global: (dr7 >> (enable_shift + 1)) & 1 != 0,
        condition: decode_condition(((dr7 >> control_shift) & 0x3) as u8),
        size: decode_length(((dr7 >> (control_shift + 2)) & 0x3) as u8),
    }
}

/// Decodes all four breakpoint slots from a DR7 value
pub fn decode_dr7(dr7: u64) -> [BreakpointSlot; BREAKPOINT_SLOTS] {
    [
        decode_slot(dr7, 0),
        decode_slot(dr7, 1),
        decode_slot(dr7, 2),
        decode_slot(dr7, 3),
    ]
}

/// Assembles the debug register block from raw DR0-DR3, DR6 and DR7
pub fn decode_debug_registers(dr: [u64; 4], dr6: u64, dr7: u64) -> DebugRegisters {
    DebugRegisters {
        dr0: dr[0],
        dr1: dr[1],
        dr2: dr[2],
        dr3: dr[3],
        dr6,
        dr7,
        breakpoints: decode_dr7(dr7),
    }
}
