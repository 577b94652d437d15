//! Thread enumeration and owning-process filtering

use crate::backend::IntrospectionBackend;
use crate::core::types::{IntrospectError, IntrospectResult, ProcessId, ThreadEntry, ThreadId};
use tracing::debug;

/// First entry in enumeration order owned by `pid`
///
/// This is a heuristic. Snapshot order usually puts the initial thread of a
/// process first, but nothing guarantees it was the first thread created.
pub fn find_main_thread(entries: &[ThreadEntry], pid: ProcessId) -> IntrospectResult<ThreadId> {
    entries
        .iter()
        .find(|entry| entry.is_owned_by(pid))
        .map(|entry| entry.thread_id)
        .ok_or(IntrospectError::ThreadNotFound { pid })
}

/// Entries owned by `pid`, keeping snapshot order
pub fn threads_owned_by(entries: &[ThreadEntry], pid: ProcessId) -> Vec<ThreadEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_owned_by(pid))
        .copied()
        .collect()
}

/// Lists OS threads and picks out those of one process
pub struct ThreadEnumerator<B: IntrospectionBackend> {
    backend: B,
}

impl<B: IntrospectionBackend> ThreadEnumerator<B> {
    /// Create a new enumerator on a backend
    pub fn new(backend: B) -> Self {
        ThreadEnumerator { backend }
    }

    /// System-wide thread snapshot in enumeration order
    pub fn list_threads(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        let entries = self.backend.thread_snapshot()?;
        debug!("thread snapshot: {} entries", entries.len());
        Ok(entries)
    }

    /// Threads owned by `pid`
    ///
    /// An empty list is not an error here; use [`Self::find_main_thread`] when
    /// the process must have a thread.
    pub fn list_process_threads(&self, pid: ProcessId) -> IntrospectResult<Vec<ThreadEntry>> {
        Ok(threads_owned_by(&self.list_threads()?, pid))
    }

    /// First thread in enumeration order owned by `pid`
    pub fn find_main_thread(&self, pid: ProcessId) -> IntrospectResult<ThreadId> {
        let tid = find_main_thread(&self.list_threads()?, pid)?;
        debug!("process {}: main thread {}", pid, tid);
        Ok(tid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<ThreadEntry> {
        vec![
            ThreadEntry::new(8, 4),
            ThreadEntry::new(1204, 1200),
            ThreadEntry::new(1208, 1200),
            ThreadEntry::new(990, 1200),
            ThreadEntry::new(3000, 2996),
        ]
    }

    #[test]
    fn test_first_owned_entry_wins() {
        assert_eq!(find_main_thread(&snapshot(), 1200).unwrap(), 1204);
        assert_eq!(find_main_thread(&snapshot(), 2996).unwrap(), 3000);
    }

    #[test]
    fn test_no_owned_threads() {
        let err = find_main_thread(&snapshot(), 77).unwrap_err();
        assert_eq!(err, IntrospectError::ThreadNotFound { pid: 77 });

        let err = find_main_thread(&[], 1200).unwrap_err();
        assert_eq!(err, IntrospectError::ThreadNotFound { pid: 1200 });
    }

    #[test]
    fn test_threads_owned_by_keeps_order() {
        let tids: Vec<ThreadId> = threads_owned_by(&snapshot(), 1200)
            .iter()
            .map(|entry| entry.thread_id)
            .collect();
        assert_eq!(tids, vec![1204, 1208, 990]);
        assert!(threads_owned_by(&snapshot(), 5).is_empty());
    }
}
