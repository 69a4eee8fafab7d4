//! Settings file discovery and environment overrides.
//!
//! Resolution order (later overrides earlier):
//! 1. Built-in defaults
//! 2. An explicit config file, or else `./warden.toml`, or else
//!    `~/.config/warden/config.toml`
//! 3. `WARDEN_*` environment variables

use std::path::{Path, PathBuf};

use crate::secrets::{ResolvedSecret, resolve_session_secret_with};
use crate::{ConfigError, Result, Settings};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "warden.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for config directory resolution.
const APP_NAME: &str = "warden";

/// Overrides `sessions_dir`.
pub const SESSIONS_DIR_ENV: &str = "WARDEN_SESSIONS_DIR";

/// Overrides `session_ttl_secs`.
pub const SESSION_TTL_ENV: &str = "WARDEN_SESSION_TTL_SECS";

/// Overrides `profile_base_url`.
pub const PROFILE_URL_ENV: &str = "WARDEN_PROFILE_URL";

/// Result of settings discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    /// The effective settings.
    pub settings: Settings,
    /// File the settings were read from, if any.
    pub source: Option<PathBuf>,
    /// The resolved session secret.
    pub secret: ResolvedSecret,
    /// Warnings generated during loading (e.g., plaintext secrets).
    pub warnings: Vec<String>,
}

/// Load settings from disk and the process environment.
///
/// An explicit `path` must exist. Without one, the project-local and user
/// config files are tried in turn and defaults are used if neither exists.
pub fn load_settings(path: Option<&Path>) -> Result<LoadedSettings> {
    let user_config = user_config_path();
    load_settings_with(path, Path::new("."), user_config.as_deref(), |key| {
        std::env::var(key).ok()
    })
}

/// Load settings with explicit discovery locations and environment lookup.
///
/// `user_config` is the per-user config file to fall back on; pass `None` to
/// skip it.
pub fn load_settings_with<F>(
    path: Option<&Path>,
    project_dir: &Path,
    user_config: Option<&Path>,
    lookup: F,
) -> Result<LoadedSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();

    let (mut settings, source) = match path {
        Some(path) => (load_settings_file(path)?, Some(path.to_path_buf())),
        None => {
            let candidates = [
                Some(project_dir.join(PROJECT_CONFIG_FILE)),
                user_config.map(Path::to_path_buf),
            ];
            match candidates.into_iter().flatten().find(|p| p.is_file()) {
                Some(found) => (load_settings_file(&found)?, Some(found)),
                None => (Settings::default(), None),
            }
        }
    };

    apply_env_overrides(&mut settings, &lookup)?;
    settings.validate()?;

    let secret = resolve_session_secret_with(settings.secret.as_deref(), &lookup);
    if settings.secret.is_some() {
        warnings.push(
            "session secret is stored in plaintext in the config file; prefer the SESSION_SECRET env var"
                .to_string(),
        );
    }
    if secret.is_default() {
        warnings.push(
            "no session secret configured; using the built-in default. Set SESSION_SECRET"
                .to_string(),
        );
    }

    Ok(LoadedSettings {
        settings,
        source,
        secret,
        warnings,
    })
}

/// Load settings from a specific file path (no discovery, no overrides).
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Settings::from_toml(&contents)
}

/// Path of the per-user config file (`~/.config/warden/config.toml` on Linux).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(USER_CONFIG_FILE))
}

fn apply_env_overrides<F>(settings: &mut Settings, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(dir) = non_empty(SESSIONS_DIR_ENV) {
        settings.sessions_dir = PathBuf::from(dir);
    }
    if let Some(url) = non_empty(PROFILE_URL_ENV) {
        settings.profile_base_url = url;
    }
    if let Some(ttl) = non_empty(SESSION_TTL_ENV) {
        settings.session_ttl_secs = ttl.parse().map_err(|e| ConfigError::Invalid {
            field: SESSION_TTL_ENV.to_string(),
            reason: format!("{e}"),
        })?;
    }
    Ok(())
}
