//! Thread snapshot entries

use super::{ProcessId, ThreadId};
use serde::Serialize;

/// One thread seen in a system thread snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEntry {
    pub thread_id: ThreadId,
    pub owner_process_id: ProcessId,
}

impl ThreadEntry {
    pub fn new(thread_id: ThreadId, owner_process_id: ProcessId) -> Self {
        ThreadEntry {
            thread_id,
            owner_process_id,
        }
    }

    /// Check if this thread belongs to `pid`
    pub fn is_owned_by(&self, pid: ProcessId) -> bool {
        self.owner_process_id == pid
    }
}
