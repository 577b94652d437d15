//! Scripted backend shared by the integration tests

#![allow(dead_code)]

use hedgehog_native::backend::{
    IntrospectionBackend, ProcessAccess, ProcessSession, ThreadAccess, ThreadSession,
};
use hedgehog_native::core::types::{
    AcquisitionReason, Address, CpuContext, GeneralPurposeRegisters, IntrospectError,
    IntrospectResult, PageAccess, PlatformCode, ProcessId, Protection, RegionQuery, RegionState,
    RegionType, SegmentRegisters, ThreadEntry, ThreadId, X64Registers,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

pub const FAKE_PID: ProcessId = 4242;

/// Counters the sessions update so tests can check acquisition and release
#[derive(Debug, Default)]
pub struct Tally {
    pub process_opens: Cell<usize>,
    pub thread_opens: Cell<usize>,
    pub live_sessions: Cell<usize>,
}

impl Tally {
    fn opened(&self, counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
        self.live_sessions.set(self.live_sessions.get() + 1);
    }

    fn closed(&self) {
        self.live_sessions.set(self.live_sessions.get() - 1);
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    /// Contiguous layout starting at address 0; queries past the end fail
    pub layout: Vec<RegionQuery>,
    /// Readable spans as (base, bytes)
    pub memory: Vec<(u64, Vec<u8>)>,
    pub threads: Vec<ThreadEntry>,
    pub contexts: HashMap<ThreadId, CpuContext>,
    pub deny_process: Option<AcquisitionReason>,
    pub deny_snapshot: bool,
    pub tally: Tally,
}

#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    pub state: Rc<FakeState>,
}

impl FakeBackend {
    pub fn new(state: FakeState) -> Self {
        FakeBackend {
            state: Rc::new(state),
        }
    }

    pub fn tally(&self) -> &Tally {
        &self.state.tally
    }
}

pub struct FakeProcess {
    pid: ProcessId,
    state: Rc<FakeState>,
}

impl ProcessSession for FakeProcess {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn query_region(&self, address: Address) -> Option<RegionQuery> {
        self.state
            .layout
            .iter()
            .find(|query| {
                let start = query.base_address.as_u64();
                let offset = address.as_u64().wrapping_sub(start);
                address.as_u64() >= start && (offset < query.size || query.size == 0)
            })
            .copied()
    }

    fn read(&self, address: Address, buffer: &mut [u8]) -> Result<usize, PlatformCode> {
        let addr = address.as_u64();
        for (base, bytes) in &self.state.memory {
            let end = base + bytes.len() as u64;
            if addr >= *base && addr < end {
                let offset = (addr - base) as usize;
                let available = &bytes[offset..];
                let n = available.len().min(buffer.len());
                buffer[..n].copy_from_slice(&available[..n]);
                return Ok(n);
            }
        }
        Err(PlatformCode(299))
    }
}

impl Drop for FakeProcess {
    fn drop(&mut self) {
        self.state.tally.closed();
    }
}

pub struct FakeThread {
    tid: ThreadId,
    state: Rc<FakeState>,
}

impl ThreadSession for FakeThread {
    fn tid(&self) -> ThreadId {
        self.tid
    }

    fn capture_context(&self) -> IntrospectResult<CpuContext> {
        self.state.contexts.get(&self.tid).copied().ok_or_else(|| {
            IntrospectError::context_unavailable(self.tid, "thread is gone", PlatformCode(31))
        })
    }
}

impl Drop for FakeThread {
    fn drop(&mut self) {
        self.state.tally.closed();
    }
}

impl IntrospectionBackend for FakeBackend {
    type Process = FakeProcess;
    type Thread = FakeThread;

    fn name(&self) -> &'static str {
        "fake"
    }

    fn open_process(&self, pid: ProcessId, _access: ProcessAccess) -> IntrospectResult<FakeProcess> {
        if let Some(reason) = self.state.deny_process {
            return Err(IntrospectError::process_unavailable(pid, reason, PlatformCode(5)));
        }
        self.state.tally.opened(&self.state.tally.process_opens);
        Ok(FakeProcess {
            pid,
            state: Rc::clone(&self.state),
        })
    }

    fn open_thread(&self, tid: ThreadId, _access: ThreadAccess) -> IntrospectResult<FakeThread> {
        if !self.state.threads.iter().any(|entry| entry.thread_id == tid) {
            return Err(IntrospectError::thread_unavailable(
                tid,
                AcquisitionReason::NotFound,
                PlatformCode(87),
            ));
        }
        self.state.tally.opened(&self.state.tally.thread_opens);
        Ok(FakeThread {
            tid,
            state: Rc::clone(&self.state),
        })
    }

    fn thread_snapshot(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        if self.state.deny_snapshot {
            return Err(IntrospectError::snapshot_unavailable(
                AcquisitionReason::PermissionDenied,
                PlatformCode(5),
            ));
        }
        Ok(self.state.threads.clone())
    }
}

pub fn query(base: u64, size: u64, state: RegionState, access: PageAccess) -> RegionQuery {
    RegionQuery {
        base_address: Address::new(base),
        size,
        state,
        protection: Protection {
            access,
            guard: false,
            no_cache: false,
            write_combine: false,
        },
        region_type: RegionType::Private,
    }
}

/// Lays regions end to end from address 0, alternating free and committed
pub fn alternating_layout(sizes: &[u64]) -> Vec<RegionQuery> {
    let mut base = 0;
    sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| {
            let state = if i % 2 == 0 {
                RegionState::Free
            } else {
                RegionState::Committed
            };
            let region = query(base, size, state, PageAccess::ReadWrite);
            base += size;
            region
        })
        .collect()
}

pub fn context_with_rip(rip: u64, eflags: u32, dr7: u64) -> CpuContext {
    CpuContext {
        general_purpose: GeneralPurposeRegisters::X64(X64Registers {
            rip,
            ..X64Registers::default()
        }),
        eflags,
        dr: [0x1000, 0x2000, 0, 0],
        dr6: 0,
        dr7,
        segments: SegmentRegisters {
            cs: 0x33,
            ss: 0x2b,
            ..SegmentRegisters::default()
        },
    }
}
