//! Profile client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent unless the builder overrides it.
///
/// Older deployments of the identity service identified callers as
/// `SessionManager/1.0`; pass that to [`ClientBuilder::user_agent`] where a
/// server still filters on it.
pub const DEFAULT_USER_AGENT: &str = concat!("warden-client/", env!("CARGO_PKG_VERSION"));

/// Client for the remote identity service.
///
/// Issues one request per call: no retries, no caching, no rate limiting.
///
/// # Example
///
/// ```no_run
/// use warden_client::ProfileClient;
///
/// # async fn example() -> warden_client::Result<()> {
/// let client = ProfileClient::builder()
///     .base_url("https://api.example.com")
///     .build()?;
///
/// let profile = client.fetch_user_profile(7).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProfileClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ProfileClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the URL for a user's profile.
    pub(crate) fn profile_url(&self, user_id: i64) -> Result<Url> {
        self.inner
            .base_url
            .join(&format!("users/{}", user_id))
            .map_err(Error::from)
    }

    /// Fetch the profile of `user_id` as raw JSON.
    ///
    /// A non-success status becomes [`Error::Api`] carrying the status code
    /// and its reason phrase.
    pub async fn fetch_user_profile(&self, user_id: i64) -> Result<serde_json::Value> {
        let url = self.profile_url(user_id)?;
        debug!(user_id, url = %url, "Fetching user profile");

        let response = self
            .inner
            .http
            .get(url)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Builder for creating a [`ProfileClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL of the identity service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent. Defaults to [`DEFAULT_USER_AGENT`].
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ProfileClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(ProfileClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
