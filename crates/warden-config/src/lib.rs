//! Configuration for the Warden session service.
//!
//! Provides TOML-based settings with:
//! - Defaults suitable for a single-host deployment
//! - Config file discovery (explicit path → `./warden.toml` → user config dir)
//! - `WARDEN_*` environment overrides
//! - Session secret resolution (env var → config file → built-in default)

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{LoadedSettings, load_settings, load_settings_file, load_settings_with};
pub use error::{ConfigError, Result};
pub use secrets::{ResolvedSecret, SecretSource, resolve_session_secret};
pub use types::*;
