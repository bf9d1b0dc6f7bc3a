//! Upload progress tracking shared between request workers.
//!
//! # Data Flow
//! ```text
//! ingest request ──▶ SessionStore::start_upload ──▶ UploadSession
//!                        (fresh record, total from Content-Length)
//!     multipart chunks ──▶ UploadSession::add_loaded
//!
//! poll request ──▶ SessionStore::status ──▶ UploadSession::snapshot
//!                        (get-or-create, never mutates progress)
//! ```
//!
//! # Design Decisions
//! - `total` is fixed at creation; `-1` means the transport gave no length
//! - `loaded` only grows, and only the ingest path grows it
//! - Both fields sit behind one mutex so a concurrent poll always reads
//!   a consistent pair

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

/// A consistent read of one upload's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Expected byte count, `-1` when unknown.
    pub total: i64,
    /// Bytes consumed so far.
    pub loaded: u64,
}

#[derive(Debug)]
struct Progress {
    total: i64,
    loaded: u64,
}

/// Per-session upload state, shared between the ingest worker and any
/// number of concurrent pollers.
#[derive(Debug)]
pub struct UploadSession {
    inner: Mutex<Progress>,
}

impl UploadSession {
    fn new(total: i64) -> Self {
        Self {
            inner: Mutex::new(Progress { total, loaded: 0 }),
        }
    }

    /// Scratch tracker for forms ingested outside an upload scenario;
    /// never stored, so its counts are invisible to pollers.
    pub fn detached() -> Self {
        Self::new(0)
    }

    /// Record `n` more consumed bytes. The only mutation path.
    pub fn add_loaded(&self, n: u64) {
        let mut progress = self.inner.lock().expect("upload session lock poisoned");
        progress.loaded += n;
    }

    /// Read `total` and `loaded` together.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let progress = self.inner.lock().expect("upload session lock poisoned");
        ProgressSnapshot {
            total: progress.total,
            loaded: progress.loaded,
        }
    }
}

/// Keyed store of upload sessions, one slot per client session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<UploadSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new upload for this session, replacing any previous
    /// upload's record. `total` comes from the declared content length.
    pub fn start_upload(&self, session_id: &str, total: i64) -> Arc<UploadSession> {
        let session = Arc::new(UploadSession::new(total));
        self.sessions
            .insert(session_id.to_string(), session.clone());
        session
    }

    /// Look up the session's current upload, if any.
    pub fn get(&self, session_id: &str) -> Option<Arc<UploadSession>> {
        self.sessions.get(session_id).map(|s| s.value().clone())
    }

    /// Fetch the session for a status poll, materializing an empty one
    /// when no ingest has run yet so the poll still gets a well-formed
    /// snapshot.
    pub fn status(&self, session_id: &str) -> Arc<UploadSession> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(UploadSession::new(0)))
            .clone()
    }
}
