//! CONTEXT record conversion
//!
//! The register layout follows the architecture the crate was built for, so
//! the general-purpose variant is fixed at compile time.

use crate::core::types::{CpuContext, SegmentRegisters};
use winapi::shared::minwindef::DWORD;
use winapi::um::winnt::CONTEXT;

#[cfg(target_arch = "x86_64")]
use crate::core::types::{GeneralPurposeRegisters, X64Registers};

#[cfg(target_arch = "x86")]
use crate::core::types::{GeneralPurposeRegisters, X86Registers};

/// Register groups requested from GetThreadContext
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub fn context_flags() -> DWORD {
    use winapi::um::winnt::{CONTEXT_DEBUG_REGISTERS, CONTEXT_FULL};
    CONTEXT_FULL | CONTEXT_DEBUG_REGISTERS
}

/// Register groups requested from GetThreadContext
#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
pub fn context_flags() -> DWORD {
    0
}

/// Converts a captured x64 CONTEXT
#[cfg(target_arch = "x86_64")]
pub fn convert_context(context: &CONTEXT) -> Option<CpuContext> {
    Some(CpuContext {
        general_purpose: GeneralPurposeRegisters::X64(X64Registers {
            rax: context.Rax,
            rbx: context.Rbx,
            rcx: context.Rcx,
            rdx: context.Rdx,
            rsi: context.Rsi,
            rdi: context.Rdi,
            rbp: context.Rbp,
            rsp: context.Rsp,
            r8: context.R8,
            r9: context.R9,
            r10: context.R10,
            r11: context.R11,
            r12: context.R12,
            r13: context.R13,
            r14: context.R14,
            r15: context.R15,
            rip: context.Rip,
        }),
        eflags: context.EFlags,
        dr: [context.Dr0, context.Dr1, context.Dr2, context.Dr3],
        dr6: context.Dr6,
        dr7: context.Dr7,
        segments: SegmentRegisters {
            cs: context.SegCs,
            ds: context.SegDs,
            es: context.SegEs,
            fs: context.SegFs,
            gs: context.SegGs,
            ss: context.SegSs,
        },
    })
}

/// Converts a captured x86 CONTEXT
#[cfg(target_arch = "x86")]
pub fn convert_context(context: &CONTEXT) -> Option<CpuContext> {
    Some(CpuContext {
        general_purpose: GeneralPurposeRegisters::X86(X86Registers {
            eax: context.Eax,
            ebx: context.Ebx,
            ecx: context.Ecx,
            edx: context.Edx,
            esi: context.Esi,
            edi: context.Edi,
            ebp: context.Ebp,
            esp: context.Esp,
            eip: context.Eip,
        }),
        eflags: context.EFlags,
        dr: [
            u64::from(context.Dr0),
            u64::from(context.Dr1),
            u64::from(context.Dr2),
            u64::from(context.Dr3),
        ],
        dr6: u64::from(context.Dr6),
        dr7: u64::from(context.Dr7),
        // selectors occupy the low word of each DWORD slot
        segments: SegmentRegisters {
            cs: context.SegCs as u16,
            ds: context.SegDs as u16,
            es: context.SegEs as u16,
            fs: context.SegFs as u16,
            gs: context.SegGs as u16,
            ss: context.SegSs as u16,
        },
    })
}

/// No x86 register layout on this architecture
#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
pub fn convert_context(_context: &CONTEXT) -> Option<CpuContext> {
    None
}

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_convert_x64_context() {
        let mut context: CONTEXT = unsafe { mem::zeroed() };
        context.Rax = 0x1111;
        context.R15 = 0xF15;
        context.Rip = 0x7FF6_0000_1000;
        context.EFlags = 0x0246;
        context.Dr0 = 0xDEAD_0000;
        context.Dr7 = 0x0001_0101;
        context.SegCs = 0x33;
        context.SegSs = 0x2B;

        let cpu = convert_context(&context).unwrap();
        assert_eq!(cpu.general_purpose.get("rax"), Some(0x1111));
        assert_eq!(cpu.general_purpose.get("r15"), Some(0xF15));
        assert_eq!(cpu.general_purpose.instruction_pointer(), 0x7FF6_0000_1000);
        assert_eq!(cpu.eflags, 0x0246);
        assert_eq!(cpu.dr[0], 0xDEAD_0000);
        assert_eq!(cpu.dr7, 0x0001_0101);
        assert_eq!(cpu.segments.cs, 0x33);
        assert_eq!(cpu.segments.ss, 0x2B);
    }
}
