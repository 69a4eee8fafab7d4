//! One-JSON-file-per-session durable store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tracing::trace;
use uuid::Uuid;

use crate::error::{LoadError, LoadResult, PersistError, PersistResult};
use crate::persistence::DurableStore;
use crate::record::{SessionId, SessionRecord};

/// Default bound on a single read or write.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable store that keeps each session in its own JSON file.
///
/// Layout: `{dir}/{session_id}.json`. There is no index; a session exists
/// on disk iff its file does.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    timeout: Duration,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    /// Set the per-operation I/O timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for a session.
    pub fn record_path(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn write_record(&self, id: &SessionId, data: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await?;

        // Write beside the target and rename so readers never see a torn file.
        let tmp = self
            .dir
            .join(format!(".{id}.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&tmp, data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp, self.record_path(id)).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }

    /// Run a write under the I/O timeout.
    async fn bounded_write<F>(&self, id: &SessionId, write: F) -> PersistResult<()>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        match tokio::time::timeout(self.timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(PersistError::Io {
                id: id.to_string(),
                source,
            }),
            Err(_) => Err(PersistError::Timeout {
                id: id.to_string(),
                timeout: self.timeout,
            }),
        }
    }

    /// Run a read under the I/O timeout. A missing file is `NotFound`.
    async fn bounded_read<F>(&self, id: &SessionId, read: F) -> LoadResult<Vec<u8>>
    where
        F: Future<Output = std::io::Result<Vec<u8>>>,
    {
        match tokio::time::timeout(self.timeout, read).await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                Err(LoadError::NotFound(id.to_string()))
            }
            Ok(Err(source)) => Err(LoadError::Io {
                id: id.to_string(),
                source,
            }),
            Err(_) => Err(LoadError::Timeout {
                id: id.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn persist(&self, id: &SessionId, record: &SessionRecord) -> PersistResult<()> {
        let data = serde_json::to_vec(record).map_err(|source| PersistError::Serialize {
            id: id.to_string(),
            source,
        })?;

        self.bounded_write(id, self.write_record(id, &data)).await?;
        trace!(session_id = %id, bytes = data.len(), "Session written to disk");
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> LoadResult<SessionRecord> {
        let path = self.record_path(id);
        let data = self.bounded_read(id, fs::read(&path)).await?;

        let record: SessionRecord =
            serde_json::from_slice(&data).map_err(|e| LoadError::Malformed {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        if record.id != *id {
            return Err(LoadError::Malformed {
                id: id.to_string(),
                reason: format!("file contains session '{}'", record.id),
            });
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::generate_id;
    use chrono::{TimeZone, Utc};

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("sessions"));
        (dir, store)
    }

    fn record(user_id: i64) -> SessionRecord {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + chrono::Duration::milliseconds(321);
        SessionRecord::new(generate_id(), user_id, now, chrono::Duration::hours(24))
    }

    #[tokio::test]
    async fn test_persist_and_load_roundtrip() {
        let (_dir, store) = temp_store();
        let rec = record(42);

        store.persist(&rec.id, &rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap();

        assert_eq!(loaded, rec);
        assert!(store.record_path(&rec.id).exists());
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let (_dir, store) = temp_store();
        let rec = record(1);
        let mut replacement = rec.clone();
        replacement.user_id = 2;

        store.persist(&rec.id, &rec).await.unwrap();
        store.persist(&rec.id, &replacement).await.unwrap();

        assert_eq!(store.load(&rec.id).await.unwrap().user_id, 2);
        let files: Vec<_> = std::fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store.load(&generate_id()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_load_garbage_is_malformed() {
        let (_dir, store) = temp_store();
        let id = generate_id();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.record_path(&id), b"{\"id\": 12").unwrap();

        let err = store.load(&id).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_field_is_malformed() {
        let (_dir, store) = temp_store();
        let id = generate_id();
        std::fs::create_dir_all(store.dir()).unwrap();
        let body = format!(r#"{{"id":"{id}","userId":3,"createdAt":"2024-05-01T12:00:00Z"}}"#);
        std::fs::write(store.record_path(&id), body).unwrap();

        let err = store.load(&id).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_load_mismatched_id_is_malformed() {
        let (_dir, store) = temp_store();
        let rec = record(5);
        let other = generate_id();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.record_path(&other), serde_json::to_vec(&rec).unwrap()).unwrap();

        let err = store.load(&other).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_persist_into_regular_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("sessions");
        std::fs::write(&not_a_dir, b"occupied").unwrap();
        let store = FileStore::new(&not_a_dir);
        let rec = record(1);

        let err = store.persist(&rec.id, &rec).await.unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_unreadable_entry_is_io_error() {
        let (_dir, store) = temp_store();
        let id = generate_id();
        std::fs::create_dir_all(store.record_path(&id)).unwrap();

        let err = store.load(&id).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_stalled_write_times_out() {
        let (_dir, store) = temp_store();
        let store = store.with_timeout(Duration::from_millis(20));
        let id = generate_id();

        let err = store
            .bounded_write(&id, std::future::pending::<std::io::Result<()>>())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PersistError::Timeout { timeout, .. } if timeout == Duration::from_millis(20)
        ));
    }

    #[tokio::test]
    async fn test_stalled_read_times_out() {
        let (_dir, store) = temp_store();
        let store = store.with_timeout(Duration::from_millis(20));
        let id = generate_id();

        let err = store
            .bounded_read(&id, std::future::pending::<std::io::Result<Vec<u8>>>())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Timeout { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_persists_for_distinct_ids() {
        let (_dir, store) = temp_store();
        let records: Vec<_> = (0..16).map(record).collect();

        let mut handles = Vec::new();
        for rec in records.clone() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.persist(&rec.id, &rec).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for rec in &records {
            assert_eq!(&store.load(&rec.id).await.unwrap(), rec);
        }
    }
}
