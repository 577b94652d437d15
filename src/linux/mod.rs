//! Linux backend
//!
//! Regions come from `/proc/<pid>/maps`, reads go through `/proc/<pid>/mem`,
//! threads are discovered under `/proc/<pid>/task` and register state is
//! captured with ptrace. Reading another process needs the same permission as
//! attaching a debugger to it (`ptrace_scope`, matching uid or
//! `CAP_SYS_PTRACE`).

pub mod context;
pub mod maps;
pub mod tasks;

use crate::backend::{
    IntrospectionBackend, ProcessAccess, ProcessSession, ThreadAccess, ThreadSession,
};
use crate::core::types::{
    AcquisitionReason, Address, CpuContext, IntrospectError, IntrospectResult, PlatformCode,
    ProcessId, RegionQuery, ThreadEntry, ThreadId,
};
use maps::MapsEntry;
use nix::libc;
use std::fs::File;
use std::io::{self, ErrorKind};
use std::os::unix::fs::FileExt;
use std::path::Path;
use tracing::{debug, trace};

const PROC_ROOT: &str = "/proc";

/// Classify a failed procfs open
pub fn classify_acquisition(err: &io::Error) -> AcquisitionReason {
    match err.raw_os_error() {
        Some(libc::ENOENT) | Some(libc::ESRCH) => AcquisitionReason::NotFound,
        Some(libc::EACCES) | Some(libc::EPERM) => AcquisitionReason::PermissionDenied,
        _ => AcquisitionReason::Other,
    }
}

/// Open view of a process: its mappings at open time and its memory file
pub struct LinuxProcess {
    pid: ProcessId,
    mappings: Option<Vec<MapsEntry>>,
    mem: Option<File>,
}

impl LinuxProcess {
    fn open(pid: ProcessId, access: ProcessAccess) -> io::Result<LinuxProcess> {
        let proc_dir = Path::new(PROC_ROOT).join(pid.to_string());
        // kernel pids are positive i32 values
        if pid == 0 || pid > i32::MAX as u32 {
            return Err(io::Error::from_raw_os_error(libc::ESRCH));
        }

        let mappings = if access.includes(ProcessAccess::QUERY_INFORMATION) {
            Some(maps::read_maps(pid)?)
        } else {
            None
        };

        let mem = if access.includes(ProcessAccess::VM_READ) {
            Some(File::open(proc_dir.join("mem"))?)
        } else {
            None
        };

        Ok(LinuxProcess { pid, mappings, mem })
    }
}

impl ProcessSession for LinuxProcess {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn query_region(&self, address: Address) -> Option<RegionQuery> {
        let mappings = self.mappings.as_ref()?;
        Some(maps::region_at(mappings, address))
    }

    fn read(&self, address: Address, buffer: &mut [u8]) -> Result<usize, PlatformCode> {
        let mem = self.mem.as_ref().ok_or(PlatformCode(libc::EBADF))?;

        let mut transferred = 0;
        while transferred < buffer.len() {
            let Some(offset) = address.checked_add(transferred as u64) else {
                break;
            };
            match mem.read_at(&mut buffer[transferred..], offset.as_u64()) {
                Ok(0) => break,
                Ok(n) => transferred += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if transferred == 0 => return Err(PlatformCode::from(&err)),
                Err(err) => {
                    trace!("read stopped after {} bytes at {}: {}", transferred, address, err);
                    break;
                }
            }
        }

        Ok(transferred)
    }
}

impl Drop for LinuxProcess {
    fn drop(&mut self) {
        debug!("closing process {}", self.pid);
    }
}

/// Thread known to exist when the session was opened
pub struct LinuxThread {
    tid: ThreadId,
    owner: ProcessId,
}

impl LinuxThread {
    /// Process the thread belongs to
    pub fn owner(&self) -> ProcessId {
        self.owner
    }
}

impl ThreadSession for LinuxThread {
    fn tid(&self) -> ThreadId {
        self.tid
    }

    fn capture_context(&self) -> IntrospectResult<CpuContext> {
        context::capture_context(self.tid)
    }
}

/// Backend over procfs and ptrace
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxBackend;

impl IntrospectionBackend for LinuxBackend {
    type Process = LinuxProcess;
    type Thread = LinuxThread;

    fn name(&self) -> &'static str {
        "linux"
    }

    fn open_process(&self, pid: ProcessId, access: ProcessAccess) -> IntrospectResult<LinuxProcess> {
        LinuxProcess::open(pid, access).map_err(|err| {
            IntrospectError::process_unavailable(
                pid,
                classify_acquisition(&err),
                PlatformCode::from(&err),
            )
        })
    }

    fn open_thread(&self, tid: ThreadId, _access: ThreadAccess) -> IntrospectResult<LinuxThread> {
        if tid == 0 || tid > i32::MAX as u32 {
            return Err(IntrospectError::thread_unavailable(
                tid,
                AcquisitionReason::NotFound,
                PlatformCode(libc::ESRCH),
            ));
        }

        let owner = tasks::thread_group(Path::new(PROC_ROOT), tid).map_err(|err| {
            IntrospectError::thread_unavailable(
                tid,
                classify_acquisition(&err),
                PlatformCode::from(&err),
            )
        })?;
        debug!("thread {} belongs to process {}", tid, owner);

        Ok(LinuxThread { tid, owner })
    }

    fn thread_snapshot(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        let threads = tasks::snapshot_threads(Path::new(PROC_ROOT)).map_err(|err| {
            IntrospectError::snapshot_unavailable(
                classify_acquisition(&err),
                PlatformCode::from(&err),
            )
        })?;

        Ok(threads
            .into_iter()
            .map(|(tid, pid)| ThreadEntry::new(tid, pid))
            .collect())
    }
}
