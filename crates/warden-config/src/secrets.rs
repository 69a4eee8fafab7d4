//! Session secret resolution.
//!
//! Resolution order:
//! 1. `SESSION_SECRET` environment variable
//! 2. Config file (with warning)
//! 3. Built-in default (with warning)
//!
//! The secret is opaque to the session store; identifiers are not signed
//! with it.

/// Environment variable holding the session secret.
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";

/// Value used when no secret is configured anywhere.
pub const DEFAULT_SECRET: &str = "default-secret";

/// Result of secret resolution with provenance.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

impl std::fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"***")
            .field("source", &self.source)
            .finish()
    }
}

impl ResolvedSecret {
    /// Whether the built-in default is in use.
    pub fn is_default(&self) -> bool {
        self.source == SecretSource::Default
    }
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
    /// Hard-coded fallback.
    Default,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
            SecretSource::Default => write!(f, "built-in default"),
        }
    }
}

/// Resolve the session secret from the process environment.
pub fn resolve_session_secret(config_value: Option<&str>) -> ResolvedSecret {
    resolve_session_secret_with(config_value, |key| std::env::var(key).ok())
}

/// Resolve the session secret using `lookup` in place of the environment.
pub fn resolve_session_secret_with<F>(config_value: Option<&str>, lookup: F) -> ResolvedSecret
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(SESSION_SECRET_ENV)
        && !value.is_empty()
    {
        return ResolvedSecret {
            value,
            source: SecretSource::EnvVar(SESSION_SECRET_ENV.to_string()),
        };
    }

    if let Some(value) = config_value.filter(|v| !v.is_empty()) {
        return ResolvedSecret {
            value: value.to_string(),
            source: SecretSource::ConfigFile,
        };
    }

    ResolvedSecret {
        value: DEFAULT_SECRET.to_string(),
        source: SecretSource::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins() {
        let secret = resolve_session_secret_with(Some("from-file"), |key| {
            (key == SESSION_SECRET_ENV).then(|| "from-env".to_string())
        });
        assert_eq!(secret.value, "from-env");
        assert_eq!(
            secret.source,
            SecretSource::EnvVar("SESSION_SECRET".to_string())
        );
    }

    #[test]
    fn test_empty_env_falls_through_to_file() {
        let secret = resolve_session_secret_with(Some("from-file"), |_| Some(String::new()));
        assert_eq!(secret.value, "from-file");
        assert_eq!(secret.source, SecretSource::ConfigFile);
    }

    #[test]
    fn test_default_when_unset() {
        let secret = resolve_session_secret_with(None, |_| None);
        assert_eq!(secret.value, DEFAULT_SECRET);
        assert!(secret.is_default());
    }

    #[test]
    fn test_debug_hides_value() {
        let secret = resolve_session_secret_with(Some("hunter2"), |_| None);
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
