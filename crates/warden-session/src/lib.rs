//! Short-lived authentication sessions.
//!
//! This crate provides a session store with:
//! - An in-memory cache shared by all callers
//! - A durable layer consulted on cache misses, repopulating the cache
//! - A fixed lifetime (24 hours by default), checked lazily on lookup
//! - Best-effort durability: a failed write never fails session creation
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_session::{FileStore, SessionStore, StoreConfig};
//!
//! let store = SessionStore::new(StoreConfig::default(), FileStore::new("./sessions"));
//!
//! let id = store.create_session(42).await;
//! let record = store.validate(&id).await.expect("fresh session is valid");
//! assert_eq!(record.user_id, 42);
//! ```

mod cache;
mod config;
mod error;
mod file_store;
mod persistence;
mod record;
mod store;
mod ttl;

pub use cache::SessionCache;
pub use config::{DEFAULT_SESSION_TTL, Secret, StoreConfig};
pub use error::{LoadError, LoadResult, PersistError, PersistResult};
pub use file_store::{DEFAULT_IO_TIMEOUT, FileStore};
pub use persistence::{DurableStore, MemoryStore};
pub use record::{SessionId, SessionRecord, generate_id};
pub use store::{SessionStore, StoreStats};
pub use ttl::{Clock, ManualClock, SystemClock};
