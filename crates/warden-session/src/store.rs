//! Session store: in-memory cache in front of a durable layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use crate::cache::SessionCache;
use crate::config::{Secret, StoreConfig};
use crate::persistence::DurableStore;
use crate::record::{SessionId, SessionRecord, generate_id};
use crate::ttl::{Clock, SystemClock};

#[derive(Debug, Default)]
struct Counters {
    durable_loads: AtomicU64,
    durable_misses: AtomicU64,
    persist_failures: AtomicU64,
}

/// Creates and validates sessions.
///
/// The cache is authoritative for sessions this process has seen; the durable
/// layer is written on every creation and read when the cache misses.
/// Durable writes are best-effort: a failed write is logged and counted but
/// the session is still handed out, valid until the process exits.
///
/// Expired sessions are dropped from the cache when they are next looked up.
/// Their durable copies are left alone.
///
/// Cloning is cheap and every clone shares the same cache.
pub struct SessionStore<D: DurableStore> {
    cache: SessionCache,
    durable: Arc<D>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    secret: Option<Secret>,
    counters: Arc<Counters>,
}

impl<D: DurableStore> SessionStore<D> {
    /// Create a store backed by `durable`, using the wall clock.
    pub fn new(config: StoreConfig, durable: D) -> Self {
        Self::with_clock(config, durable, Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source.
    pub fn with_clock(config: StoreConfig, durable: D, clock: Arc<dyn Clock>) -> Self {
        let ttl = chrono::Duration::from_std(config.ttl)
            .unwrap_or(chrono::Duration::MAX)
            .max(chrono::Duration::seconds(1));

        Self {
            cache: SessionCache::new(),
            durable: Arc::new(durable),
            clock,
            ttl,
            secret: config.secret,
            counters: Arc::new(Counters::default()),
        }
    }

    /// The in-memory cache.
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// The durable backend.
    pub fn durable(&self) -> &D {
        &self.durable
    }

    /// The secret supplied at construction. Not used to sign identifiers.
    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    /// Mint a new session for `user_id` and return its identifier.
    ///
    /// Never fails: if the durable write fails the session lives in memory only.
    pub async fn create_session(&self, user_id: i64) -> SessionId {
        let id = generate_id();
        let record = SessionRecord::new(id, user_id, self.clock.now(), self.ttl);

        self.cache.insert(record.clone());

        match self.durable.persist(&id, &record).await {
            Ok(()) => {
                debug!(session_id = %id, user_id, expires_at = %record.expires_at, "Session created");
            }
            Err(e) => {
                self.counters.persist_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    session_id = %id,
                    user_id,
                    error = %e,
                    "Failed to persist session, keeping in-memory copy only"
                );
            }
        }

        id
    }

    /// Resolve a session identifier string to a valid record.
    ///
    /// Unparseable identifiers, unknown sessions, unreadable durable records
    /// and expired sessions all yield `None`.
    pub async fn validate_session(&self, id: &str) -> Option<SessionRecord> {
        match id.parse::<SessionId>() {
            Ok(id) => self.validate(&id).await,
            Err(_) => {
                trace!(session_id = %id, "Rejecting malformed session id");
                None
            }
        }
    }

    /// Resolve a session identifier to a valid record.
    pub async fn validate(&self, id: &SessionId) -> Option<SessionRecord> {
        let record = match self.cache.get(id) {
            Some(record) => {
                trace!(session_id = %id, "Session found in cache");
                record
            }
            None => self.load_into_cache(id).await?,
        };

        let now = self.clock.now();
        if !record.is_valid_at(now) {
            debug!(session_id = %id, expires_at = %record.expires_at, "Session expired, removing from cache");
            self.cache.remove(id);
            return None;
        }

        Some(record)
    }

    async fn load_into_cache(&self, id: &SessionId) -> Option<SessionRecord> {
        debug!(session_id = %id, "Session cache miss, loading from durable store");
        self.counters.durable_loads.fetch_add(1, Ordering::Relaxed);

        match self.durable.load(id).await {
            Ok(record) => {
                // A concurrent caller may have cached it while we were reading.
                let record = self.cache.insert_if_absent(record);
                debug!(session_id = %id, cache_size = self.cache.len(), "Session loaded from durable store");
                Some(record)
            }
            Err(e) => {
                self.counters.durable_misses.fetch_add(1, Ordering::Relaxed);
                if e.is_not_found() {
                    trace!(session_id = %id, "Session not in durable store");
                } else {
                    debug!(session_id = %id, error = %e, "Unreadable durable session treated as missing");
                }
                None
            }
        }
    }

    /// Drop a session from the cache only. The durable copy is kept, so a
    /// later validation reloads it.
    pub fn invalidate(&self, id: &SessionId) -> bool {
        let removed = self.cache.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "Session invalidated from cache");
        }
        removed
    }

    /// Remove expired sessions from the cache. Durable copies are kept.
    ///
    /// Only runs when called; nothing schedules it.
    pub fn cleanup_expired(&self) -> usize {
        let expired = self.cache.drain_expired(self.clock.now());
        if !expired.is_empty() {
            debug!(count = expired.len(), "Cleaned up expired sessions");
        }
        expired.len()
    }

    /// Store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            cached: self.cache.len(),
            durable_loads: self.counters.durable_loads.load(Ordering::Relaxed),
            durable_misses: self.counters.durable_misses.load(Ordering::Relaxed),
            persist_failures: self.counters.persist_failures.load(Ordering::Relaxed),
        }
    }
}

impl<D: DurableStore> Clone for SessionStore<D> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            durable: Arc::clone(&self.durable),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
            secret: self.secret.clone(),
            counters: Arc::clone(&self.counters),
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Records currently in the cache (expired ones not yet touched included).
    pub cached: usize,

    /// Cache misses that went to the durable layer.
    pub durable_loads: u64,

    /// Durable reads that produced no usable record.
    pub durable_misses: u64,

    /// Durable writes that failed during creation.
    pub persist_failures: u64,
}
