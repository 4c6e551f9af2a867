use std::sync::Mutex;

use chrono::Utc;

use crate::error::StoreError;
use crate::models::{LogEntry, NewLogEntry, SessionSummary};
use crate::sessions;

/// Persistence for log entries. Each call is a single read or write; there
/// are no multi-call transactions.
pub trait LogStore: Send + Sync {
    /// Persist a sample, assigning its id and timestamp.
    fn append(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError>;

    /// Every distinct (session, user) pair with its start time, most recent
    /// first.
    fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError>;

    /// All samples of a session ordered by timestamp. Unknown sessions yield
    /// an empty vector.
    fn get_session(&self, session_id: &str) -> Result<Vec<LogEntry>, StoreError>;
}

/// Log store kept in process memory. Entries are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogStore {
    pub fn new() -> MemoryLogStore {
        MemoryLogStore::default()
    }
}

impl LogStore for MemoryLogStore {
    fn append(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let id = entries.last().map_or(1, |last| last.id + 1);
        let stored = entry.into_entry(id, Utc::now());
        entries.push(stored.clone());
        Ok(stored)
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions::summarize(entries.iter()))
    }

    fn get_session(&self, session_id: &str) -> Result<Vec<LogEntry>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let mut found: Vec<LogEntry> = entries
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}
