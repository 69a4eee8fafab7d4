//! In-memory session cache.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::trace;

use crate::record::{SessionId, SessionRecord};

/// Shared map from session identifier to record.
///
/// Every operation takes the lock for the duration of a single map call, so
/// inserts are atomic with respect to readers and the lock is never held
/// across an `.await`. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    inner: Arc<RwLock<HashMap<SessionId, SessionRecord>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.inner.read().contains_key(id)
    }

    /// Copy of the cached record, if any. No expiry check.
    pub fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        self.inner.read().get(id).cloned()
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: SessionRecord) {
        let mut inner = self.inner.write();
        trace!(session_id = %record.id, cache_size = inner.len() + 1, "Session cached");
        inner.insert(record.id, record);
    }

    /// Insert `record` unless an entry already exists, returning whichever
    /// record ends up cached.
    pub fn insert_if_absent(&self, record: SessionRecord) -> SessionRecord {
        self.inner
            .write()
            .entry(record.id)
            .or_insert(record)
            .clone()
    }

    /// Remove a record from the cache.
    pub fn remove(&self, id: &SessionId) -> Option<SessionRecord> {
        self.inner.write().remove(id)
    }

    /// Remove every record that is no longer valid at `now`, returning their ids.
    pub fn drain_expired(&self, now: DateTime<Utc>) -> Vec<SessionId> {
        let mut inner = self.inner.write();
        let expired: Vec<SessionId> = inner
            .values()
            .filter(|record| !record.is_valid_at(now))
            .map(|record| record.id)
            .collect();
        for id in &expired {
            inner.remove(id);
        }
        expired
    }

    /// Drop every cached record.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::generate_id;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    fn record(user_id: i64, ttl_secs: i64) -> SessionRecord {
        SessionRecord::new(
            generate_id(),
            user_id,
            t0(),
            chrono::Duration::seconds(ttl_secs),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let cache = SessionCache::new();
        let rec = record(1, 60);
        cache.insert(rec.clone());

        assert_eq!(cache.get(&rec.id), Some(rec.clone()));
        assert!(cache.contains(&rec.id));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let cache = SessionCache::new();
        let rec = record(1, 60);
        cache.insert(rec.clone());

        let mut other = rec.clone();
        other.user_id = 99;
        let kept = cache.insert_if_absent(other);

        assert_eq!(kept.user_id, 1);
        assert_eq!(cache.get(&rec.id).unwrap().user_id, 1);
    }

    #[test]
    fn test_remove() {
        let cache = SessionCache::new();
        let rec = record(1, 60);
        cache.insert(rec.clone());

        assert_eq!(cache.remove(&rec.id), Some(rec.clone()));
        assert!(cache.is_empty());
        assert_eq!(cache.remove(&rec.id), None);
    }

    #[test]
    fn test_drain_expired() {
        let cache = SessionCache::new();
        let short = record(1, 10);
        let long = record(2, 3600);
        cache.insert(short.clone());
        cache.insert(long.clone());

        let drained = cache.drain_expired(t0() + chrono::Duration::seconds(10));
        assert_eq!(drained, vec![short.id]);
        assert!(cache.contains(&long.id));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = SessionCache::new();
        let handle = cache.clone();
        let rec = record(1, 60);
        cache.insert(rec.clone());

        assert!(handle.contains(&rec.id));
        handle.clear();
        assert!(cache.is_empty());
    }
}
