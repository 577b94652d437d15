//! CPU register snapshots

use serde::Serialize;
use std::fmt;

/// 64-bit general purpose register file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct X64Registers {
    pub rax: u64,
    pub rbx: u64,
    pub rcx: u64,
    pub rdx: u64,
    pub rsi: u64,
    pub rdi: u64,
    pub rbp: u64,
    pub rsp: u64,
    pub r8: u64,
    pub r9: u64,
    pub r10: u64,
    pub r11: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
    pub rip: u64,
}

/// 32-bit general purpose register file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct X86Registers {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
    pub esi: u32,
    pub edi: u32,
    pub ebp: u32,
    pub esp: u32,
    pub eip: u32,
}

/// General purpose registers in the width of the build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "arch", rename_all = "lowercase")]
pub enum GeneralPurposeRegisters {
    X64(X64Registers),
    X86(X86Registers),
}

impl GeneralPurposeRegisters {
    /// Register names and values in architectural order
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        match self {
            GeneralPurposeRegisters::X64(r) => vec![
                ("rax", r.rax),
                ("rbx", r.rbx),
                ("rcx", r.rcx),
                ("rdx", r.rdx),
                ("rsi", r.rsi),
                ("rdi", r.rdi),
                ("rbp", r.rbp),
                ("rsp", r.rsp),
                ("r8", r.r8),
                ("r9", r.r9),
                ("r10", r.r10),
                ("r11", r.r11),
                ("r12", r.r12),
                ("r13", r.r13),
                ("r14", r.r14),
                ("r15", r.r15),
                ("rip", r.rip),
            ],
            GeneralPurposeRegisters::X86(r) => vec![
                ("eax", u64::from(r.eax)),
                ("ebx", u64::from(r.ebx)),
                ("ecx", u64::from(r.ecx)),
                ("edx", u64::from(r.edx)),
                ("esi", u64::from(r.esi)),
                ("edi", u64::from(r.edi)),
                ("ebp", u64::from(r.ebp)),
                ("esp", u64::from(r.esp)),
                ("eip", u64::from(r.eip)),
            ],
        }
    }

    /// Looks up a register by name
    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Instruction pointer
    pub fn instruction_pointer(&self) -> u64 {
        match self {
            GeneralPurposeRegisters::X64(r) => r.rip,
            GeneralPurposeRegisters::X86(r) => u64::from(r.eip),
        }
    }
}

/// Segment selectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentRegisters {
    pub cs: u16,
    pub ds: u16,
    pub es: u16,
    pub fs: u16,
    pub gs: u16,
    pub ss: u16,
}

/// Raw register state as captured by a backend, before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuContext {
    pub general_purpose: GeneralPurposeRegisters,
    pub eflags: u32,
    /// DR0-DR3 breakpoint addresses
    pub dr: [u64; 4],
    pub dr6: u64,
    pub dr7: u64,
    pub segments: SegmentRegisters,
}

/// EFLAGS with its status and control bits decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagsState {
    pub value: u32,
    #[serde(rename = "CF")]
    pub carry: bool,
    #[serde(rename = "PF")]
    pub parity: bool,
    #[serde(rename = "AF")]
    pub adjust: bool,
    #[serde(rename = "ZF")]
    pub zero: bool,
    #[serde(rename = "SF")]
    pub sign: bool,
    #[serde(rename = "TF")]
    pub trap: bool,
    #[serde(rename = "IF")]
    pub interrupt: bool,
    #[serde(rename = "DF")]
    pub direction: bool,
    #[serde(rename = "OF")]
    pub overflow: bool,
}

impl FlagsState {
    /// Flag mnemonics and their values
    pub fn named(&self) -> [(&'static str, bool); 9] {
        [
            ("CF", self.carry),
            ("PF", self.parity),
            ("AF", self.adjust),
            ("ZF", self.zero),
            ("SF", self.sign),
            ("TF", self.trap),
            ("IF", self.interrupt),
            ("DF", self.direction),
            ("OF", self.overflow),
        ]
    }

    /// Mnemonics of the flags that are set
    pub fn set_flags(&self) -> Vec<&'static str> {
        self.named()
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Access that triggers a hardware breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakpointCondition {
    Execute,
    Write,
    Io,
    ReadWrite,
}

impl fmt::Display for BreakpointCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BreakpointCondition::Execute => "execute",
            BreakpointCondition::Write => "write",
            BreakpointCondition::Io => "io",
            BreakpointCondition::ReadWrite => "read_write",
        };
        f.write_str(name)
    }
}

/// One of the four DR7 breakpoint slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakpointSlot {
    pub index: u8,
    /// Local enable bit
    pub enabled: bool,
    /// Global enable bit
    pub global: bool,
    pub condition: BreakpointCondition,
    /// Watched length in bytes: 1, 2, 4 or 8
    pub size: u8,
}

/// Debug registers with DR7 decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebugRegisters {
    pub dr0: u64,
    pub dr1: u64,
    pub dr2: u64,
    pub dr3: u64,
    pub dr6: u64,
    pub dr7: u64,
    pub breakpoints: [BreakpointSlot; 4],
}

impl DebugRegisters {
    /// Breakpoint address held by slot `index`
    pub fn address(&self, index: usize) -> Option<u64> {
        match index {
            0 => Some(self.dr0),
            1 => Some(self.dr1),
            2 => Some(self.dr2),
            3 => Some(self.dr3),
            _ => None,
        }
    }
}

/// A thread's register file at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSnapshot {
    pub general_purpose: GeneralPurposeRegisters,
    pub flags: FlagsState,
    pub debug: DebugRegisters,
    pub segments: SegmentRegisters,
}
