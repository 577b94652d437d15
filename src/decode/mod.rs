//! Pure bit-level decoders
//!
//! Everything the backends hand back in native encoding passes through here:
//! page protection masks, region type and state codes, EFLAGS and the DR7
//! breakpoint slots. Nothing in this module touches the operating system, so
//! the decoding contracts are testable without a live process.

pub mod debug;
pub mod flags;
pub mod protection;

pub use debug::{decode_debug_registers, decode_dr7, decode_slot};
pub use flags::decode_eflags;
pub use protection::{
    decode_page_protection, decode_posix_permissions, decode_region_state, decode_region_type,
};

use crate::core::types::{CpuContext, RegisterSnapshot};

/// Decodes a raw captured context into a register snapshot
pub fn decode_context(context: &CpuContext) -> RegisterSnapshot {
    RegisterSnapshot {
        general_purpose: context.general_purpose,
        flags: decode_eflags(context.eflags),
        debug: decode_debug_registers(context.dr, context.dr6, context.dr7),
        segments: context.segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{
        BreakpointCondition, GeneralPurposeRegisters, SegmentRegisters, X64Registers,
    };

    #[test]
    fn test_decode_context() {
        let context = CpuContext {
            general_purpose: GeneralPurposeRegisters::X64(X64Registers {
                rip: 0x7FF6_0000_1000,
                ..Default::default()
            }),
            eflags: 0x0246,
            dr: [0x1000, 0, 0, 0],
            dr6: 0,
            dr7: 0x000D_0001,
            segments: SegmentRegisters {
                cs: 0x33,
                ss: 0x2B,
                ..Default::default()
            },
        };

        let snapshot = decode_context(&context);
        assert_eq!(snapshot.general_purpose.instruction_pointer(), 0x7FF6_0000_1000);
        assert_eq!(snapshot.flags.set_flags(), vec!["PF", "ZF", "IF"]);
        assert_eq!(snapshot.debug.dr0, 0x1000);
        assert!(snapshot.debug.breakpoints[0].enabled);
        assert_eq!(snapshot.debug.breakpoints[0].condition, BreakpointCondition::Write);
        assert_eq!(snapshot.debug.breakpoints[0].size, 4);
        assert_eq!(snapshot.segments.cs, 0x33);
    }
}
