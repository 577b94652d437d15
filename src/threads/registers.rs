//! Register snapshot capture

use crate::backend::{IntrospectionBackend, ThreadAccess, ThreadSession};
use crate::core::types::{IntrospectResult, RegisterSnapshot, ThreadId};
use crate::decode::decode_context;
use tracing::debug;

/// Captures and decodes the CPU context of a thread
pub struct ThreadRegisterReader<B: IntrospectionBackend> {
    backend: B,
}

impl<B: IntrospectionBackend> ThreadRegisterReader<B> {
    /// Create a new register reader on a backend
    pub fn new(backend: B) -> Self {
        ThreadRegisterReader { backend }
    }

    /// Captures general-purpose, flag, segment and debug registers of `tid`
    ///
    /// The register set is read in one call so every field belongs to the
    /// same instant of the thread's execution.
    pub fn capture(&self, tid: ThreadId) -> IntrospectResult<RegisterSnapshot> {
        let session = self.backend.open_thread(tid, ThreadAccess::capture())?;
        debug!("opened thread {} for context capture", session.tid());

        let context = session.capture_context()?;
        Ok(decode_context(&context))
    }
}
