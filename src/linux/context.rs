//! Register capture through ptrace
//!
//! The thread is seized, interrupted into a ptrace-stop, read, and detached
//! again when the guard drops. Seizing never sends a signal the target can
//! observe, and the thread resumes where it was once detached. A signal that
//! reaches the thread while it is held is re-injected on detach.

use crate::core::types::{CpuContext, IntrospectError, IntrospectResult, PlatformCode, ThreadId};
use nix::errno::Errno;

fn unavailable(tid: ThreadId, step: &str, err: Errno) -> IntrospectError {
    IntrospectError::context_unavailable(
        tid,
        format!("{} failed: {}", step, err.desc()),
        PlatformCode(err as i32),
    )
}

#[cfg(target_arch = "x86_64")]
mod x86_64 {
    use super::unavailable;
    use crate::core::types::{
        CpuContext, GeneralPurposeRegisters, IntrospectResult, SegmentRegisters, ThreadId,
        X64Registers,
    };
    use nix::errno::Errno;
    use nix::libc;
    use nix::sys::ptrace;
    use nix::sys::signal::Signal;
    use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
    use nix::unistd::Pid;
    use std::mem::offset_of;
    use tracing::{debug, warn};

    /// Detaches from the thread on every exit path, handing back any signal
    /// that arrived while it was held
    struct SeizeGuard {
        pid: Pid,
        pending: Option<Signal>,
        attached: bool,
    }

    impl Drop for SeizeGuard {
        fn drop(&mut self) {
            if !self.attached {
                return;
            }
            if let Err(err) = ptrace::detach(self.pid, self.pending) {
                warn!("detach from thread {} failed: {}", self.pid, err);
            } else {
                debug!("detached from thread {} (pending {:?})", self.pid, self.pending);
            }
        }
    }

    /// What the first stop after seizing means for the capture
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FirstStop {
        /// The interrupt or a group stop; nothing to hand back
        Interrupted,
        /// A signal-delivery stop; the signal must be re-injected on detach
        Signal(Signal),
        /// The thread exited before it stopped
        Gone,
    }

    pub fn classify_stop(tid: ThreadId, status: WaitStatus) -> IntrospectResult<FirstStop> {
        match status {
            WaitStatus::PtraceEvent(_, _, event) if event == libc::PTRACE_EVENT_STOP => {
                Ok(FirstStop::Interrupted)
            }
            WaitStatus::Stopped(_, signal) => Ok(FirstStop::Signal(signal)),
            WaitStatus::Exited(..) | WaitStatus::Signaled(..) => Ok(FirstStop::Gone),
            other => Err(unavailable(
                tid,
                &format!("unexpected wait status {:?}", other),
                Errno::EIO,
            )),
        }
    }

    fn debug_register(pid: Pid, tid: ThreadId, index: usize) -> IntrospectResult<u64> {
        let offset = offset_of!(libc::user, u_debugreg) + index * std::mem::size_of::<u64>();
        ptrace::read_user(pid, offset as ptrace::AddressType)
            .map(|value| value as u64)
            .map_err(|err| unavailable(tid, "PTRACE_PEEKUSER", err))
    }

    pub fn capture(tid: ThreadId) -> IntrospectResult<CpuContext> {
        let pid = Pid::from_raw(tid as i32);

        ptrace::seize(pid, ptrace::Options::empty())
            .map_err(|err| unavailable(tid, "PTRACE_SEIZE", err))?;
        let mut guard = SeizeGuard {
            pid,
            pending: None,
            attached: true,
        };

        ptrace::interrupt(pid).map_err(|err| unavailable(tid, "PTRACE_INTERRUPT", err))?;
        let status = waitpid(pid, Some(WaitPidFlag::__WALL))
            .map_err(|err| unavailable(tid, "waitpid", err))?;
        match classify_stop(tid, status)? {
            FirstStop::Interrupted => {}
            FirstStop::Signal(signal) => guard.pending = Some(signal),
            FirstStop::Gone => {
                guard.attached = false;
                return Err(unavailable(tid, "waiting for the stop", Errno::ESRCH));
            }
        }

        let regs = ptrace::getregs(pid).map_err(|err| unavailable(tid, "PTRACE_GETREGS", err))?;
        let dr = [
            debug_register(pid, tid, 0)?,
            debug_register(pid, tid, 1)?,
            debug_register(pid, tid, 2)?,
            debug_register(pid, tid, 3)?,
        ];
        let dr6 = debug_register(pid, tid, 6)?;
        let dr7 = debug_register(pid, tid, 7)?;

        Ok(CpuContext {
            general_purpose: GeneralPurposeRegisters::X64(X64Registers {
                rax: regs.rax,
                rbx: regs.rbx,
                rcx: regs.rcx,
                rdx: regs.rdx,
                rsi: regs.rsi,
                rdi: regs.rdi,
                rbp: regs.rbp,
                rsp: regs.rsp,
                r8: regs.r8,
                r9: regs.r9,
                r10: regs.r10,
                r11: regs.r11,
                r12: regs.r12,
                r13: regs.r13,
                r14: regs.r14,
                r15: regs.r15,
                rip: regs.rip,
            }),
            eflags: regs.eflags as u32,
            dr,
            dr6,
            dr7,
            segments: SegmentRegisters {
                cs: regs.cs as u16,
                ds: regs.ds as u16,
                es: regs.es as u16,
                fs: regs.fs as u16,
                gs: regs.gs as u16,
                ss: regs.ss as u16,
            },
        })
    }
}

/// Captures the register state of `tid`
///
/// The thread is traced for the duration of the call. A thread can have only
/// one tracer, so a second capture of the same tid running at the same time,
/// or a capture of a thread under a debugger, fails with `EPERM`.
#[cfg(target_arch = "x86_64")]
pub fn capture_context(tid: ThreadId) -> IntrospectResult<CpuContext> {
    x86_64::capture(tid)
}

/// Captures the register state of `tid`
#[cfg(not(target_arch = "x86_64"))]
pub fn capture_context(tid: ThreadId) -> IntrospectResult<CpuContext> {
    Err(unavailable(tid, "register capture on this architecture", Errno::ENOSYS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_missing_thread() {
        // tids are bounded by pid_max, which is far below this
        let err = capture_context(0x7FFF_FFF0).unwrap_err();
        assert!(matches!(err, IntrospectError::ContextUnavailable { tid: 0x7FFF_FFF0, .. }));
        assert_ne!(err.platform_code(), Some(PlatformCode::NONE));
    }

    #[cfg(target_arch = "x86_64")]
    mod stops {
        use super::super::x86_64::{classify_stop, FirstStop};
        use nix::libc;
        use nix::sys::signal::Signal;
        use nix::sys::wait::WaitStatus;
        use nix::unistd::Pid;

        const TID: u32 = 4321;

        fn pid() -> Pid {
            Pid::from_raw(TID as i32)
        }

        #[test]
        fn test_interrupt_stop_has_nothing_pending() {
            let status = WaitStatus::PtraceEvent(pid(), Signal::SIGTRAP, libc::PTRACE_EVENT_STOP);
            assert_eq!(classify_stop(TID, status).unwrap(), FirstStop::Interrupted);

            let group = WaitStatus::PtraceEvent(pid(), Signal::SIGSTOP, libc::PTRACE_EVENT_STOP);
            assert_eq!(classify_stop(TID, group).unwrap(), FirstStop::Interrupted);
        }

        #[test]
        fn test_signal_delivery_stop_keeps_the_signal() {
            let status = WaitStatus::Stopped(pid(), Signal::SIGUSR1);
            assert_eq!(
                classify_stop(TID, status).unwrap(),
                FirstStop::Signal(Signal::SIGUSR1)
            );

            let status = WaitStatus::Stopped(pid(), Signal::SIGTERM);
            assert_eq!(
                classify_stop(TID, status).unwrap(),
                FirstStop::Signal(Signal::SIGTERM)
            );
        }

        #[test]
        fn test_exit_before_stop() {
            assert_eq!(
                classify_stop(TID, WaitStatus::Exited(pid(), 0)).unwrap(),
                FirstStop::Gone
            );
            assert_eq!(
                classify_stop(TID, WaitStatus::Signaled(pid(), Signal::SIGKILL, false)).unwrap(),
                FirstStop::Gone
            );
        }

        #[test]
        fn test_other_statuses_are_errors() {
            let err = classify_stop(TID, WaitStatus::StillAlive).unwrap_err();
            assert_eq!(err.kind(), "ContextUnavailable");
        }
    }
}
