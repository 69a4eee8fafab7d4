//! Durable storage backends for session records.
//!
//! The [`DurableStore`] trait decouples the session store from a specific
//! medium. The store writes through it on creation and reads through it when
//! the in-memory cache misses. [`FileStore`](crate::FileStore) keeps one JSON
//! file per session; [`MemoryStore`] keeps records in process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{LoadError, LoadResult, PersistResult};
use crate::record::{SessionId, SessionRecord};

/// Trait for durable session backends.
///
/// Implementations must tolerate concurrent calls for different identifiers
/// and must bound their own I/O, reporting a timeout as an error.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Write `record` under `id`, replacing anything already stored there.
    async fn persist(&self, id: &SessionId, record: &SessionRecord) -> PersistResult<()>;

    /// Read the record stored under `id`.
    ///
    /// Returns [`LoadError::NotFound`] when nothing is stored and
    /// [`LoadError::Malformed`] when the stored data is not a valid record.
    async fn load(&self, id: &SessionId) -> LoadResult<SessionRecord>;
}

/// Durable layer kept in process memory.
///
/// Does not survive a restart; useful for tests and for running without a
/// writable disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn persist(&self, id: &SessionId, record: &SessionRecord) -> PersistResult<()> {
        self.records.write().insert(*id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> LoadResult<SessionRecord> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(id.to_string()))
    }
}
