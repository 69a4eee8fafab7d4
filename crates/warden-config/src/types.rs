//! Configuration types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default directory for durable session files.
pub const DEFAULT_SESSIONS_DIR: &str = "./sessions";

/// Default session lifetime in seconds (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Default bound on a single durable read or write, in milliseconds.
pub const DEFAULT_IO_TIMEOUT_MS: u64 = 5_000;

/// Default base URL of the remote identity service.
pub const DEFAULT_PROFILE_BASE_URL: &str = "https://api.example.com";

/// Service settings, as read from `warden.toml`.
///
/// ```toml
/// sessions_dir = "/var/lib/warden/sessions"
/// session_ttl_secs = 86400
/// io_timeout_ms = 5000
/// profile_base_url = "https://id.internal"
/// log_dir = "/var/log/warden"
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one JSON file per session.
    pub sessions_dir: PathBuf,

    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,

    /// Timeout for each durable read or write, in milliseconds.
    pub io_timeout_ms: u64,

    /// Base URL for user profile lookups.
    pub profile_base_url: String,

    /// When set, JSON logs are also written here with daily rotation.
    pub log_dir: Option<PathBuf>,

    /// Session secret (plaintext; prefer the `SESSION_SECRET` env var).
    pub secret: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sessions_dir: PathBuf::from(DEFAULT_SESSIONS_DIR),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            io_timeout_ms: DEFAULT_IO_TIMEOUT_MS,
            profile_base_url: DEFAULT_PROFILE_BASE_URL.to_string(),
            log_dir: None,
            secret: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("sessions_dir", &self.sessions_dir)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("io_timeout_ms", &self.io_timeout_ms)
            .field("profile_base_url", &self.profile_base_url)
            .field("log_dir", &self.log_dir)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Session lifetime.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Durable I/O timeout.
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session_ttl_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.io_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "io_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.profile_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "profile_base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
