//! CLI command handlers.

pub mod create;
pub mod profile;
pub mod validate;

use std::sync::Arc;

use warden_config::LoadedSettings;
use warden_session::{FileStore, SessionStore, StoreConfig};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective settings and resolved secret.
    pub loaded: Arc<LoadedSettings>,
    /// Output as JSON for scripting.
    pub json_output: bool,
}

impl Context {
    /// Open the session store described by the settings.
    pub fn session_store(&self) -> SessionStore<FileStore> {
        let settings = &self.loaded.settings;
        let config = StoreConfig::new()
            .with_ttl(settings.session_ttl())
            .with_secret(self.loaded.secret.value.as_str());
        let durable = FileStore::new(&settings.sessions_dir).with_timeout(settings.io_timeout());
        SessionStore::new(config, durable)
    }
}
