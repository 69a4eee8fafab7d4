//! Session identifiers and records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, unguessable session identifier.
///
/// Backed by a random (v4) UUID. The textual form is the hyphenated lowercase
/// UUID, which is also safe to use as a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Generate a fresh session identifier.
///
/// Draws from the OS random source; panics if that source is unavailable,
/// which is not something a session store can recover from.
pub fn generate_id() -> SessionId {
    SessionId(Uuid::new_v4())
}

/// A session bound to a user. Immutable once created.
///
/// Serialized with camelCase field names and RFC 3339 timestamps:
///
/// ```json
/// {"id":"…","userId":42,"createdAt":"2024-05-01T12:00:00.123Z","expiresAt":"…"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Build a record that lives for `ttl` starting at `now`.
    pub fn new(id: SessionId, user_id: i64, now: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        Self {
            id,
            user_id,
            created_at: now,
            expires_at: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// A record is valid strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
