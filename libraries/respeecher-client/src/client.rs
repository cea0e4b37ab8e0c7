//! Main Respeecher API client.

use crate::config::ClientConfig;
use crate::cookies::SessionCookieJar;
use crate::error::{RespeecherError, Result};
use crate::session::{AuthState, Session};
use crate::store::{CredentialStore, MemoryCredentialStore};
use crate::types::{Model, User};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};
use url::Url;

/// Endpoint paths relative to the base URL.
pub(crate) mod paths {
    pub const LOGIN: &str = "login";
    pub const MODELS: &str = "models";
    pub const PROJECTS: &str = "projects";
    pub const PHRASES: &str = "phrases";
    pub const RECORDINGS: &str = "recordings";
    pub const CONVERSION_ORDER: &str = "recordings/conversion-order";
    pub const CALIBRATIONS: &str = "calibrations";
    pub const TTS_VOICES: &str = "tts-voice";
    pub const TTS_CREATE: &str = "recordings/tts";
}

/// Client for the Respeecher voice conversion API.
///
/// Holds the session (CSRF token, cookies, current user) and exposes one
/// async method per API operation. Cloning is cheap and clones share the
/// session.
///
/// # Example
///
/// ```ignore
/// use respeecher_client::{ClientConfig, RespeecherClient};
///
/// let client = RespeecherClient::new(ClientConfig::default())?;
/// let user = client.login("user@example.com", "password").await?;
/// println!("Logged in as {}", user.username);
///
/// for project in client.fetch_projects(None).await? {
///     println!("{}", project.name);
/// }
/// ```
#[derive(Clone)]
pub struct RespeecherClient {
    pub(crate) http: Client,
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) session: Arc<RwLock<Session>>,
    pub(crate) cookies: Arc<SessionCookieJar>,
    pub(crate) store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for RespeecherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RespeecherClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl RespeecherClient {
    /// Create a client whose session lives only in memory.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(
            config,
            Arc::new(MemoryCredentialStore::new()),
            Session::new(String::new(), false),
        )
    }

    /// Create a client and resume the session saved in `store`, if any.
    ///
    /// The session counts as authenticated only when both a non-empty token
    /// and at least one cookie were stored.
    pub async fn with_store(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let stored = match store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to load stored credentials, starting signed out");
                Default::default()
            }
        };

        let resumable = stored.is_resumable();
        let session = Session::new(stored.token.clone().unwrap_or_default(), resumable);
        let client = Self::build(config, store, session)?;

        if !stored.cookies.is_empty() {
            client
                .cookies
                .restore(&stored.cookies, &client.base_url()?);
        }

        debug!(
            authenticated = resumable,
            cookies = stored.cookies.len(),
            "Restored session"
        );

        Ok(client)
    }

    fn build(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        session: Session,
    ) -> Result<Self> {
        let config = config.normalized()?;
        let cookies = Arc::new(SessionCookieJar::new());

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("respeecher-client/{}", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|e| RespeecherError::InvalidConfig(e.to_string()))?;

        info!(base_url = %config.base_url, "Respeecher client ready");

        Ok(Self {
            http,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(session)),
            cookies,
            store,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL of an endpoint path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    pub(crate) fn base_url(&self) -> Result<Url> {
        Url::parse(&format!("{}/", self.config.base_url))
            .map_err(|e| RespeecherError::InvalidConfig(e.to_string()))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.authenticated
    }

    pub async fn auth_state(&self) -> AuthState {
        self.session.read().await.state()
    }

    /// The user returned by the last successful login.
    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    /// Current CSRF token, empty when signed out.
    pub async fn token(&self) -> String {
        self.session.read().await.token.clone()
    }

    /// Watch the authenticated flag.
    ///
    /// The receiver sees every change, including the forced sign-out that
    /// follows a 401, 402 or 403 response.
    pub async fn subscribe_auth(&self) -> watch::Receiver<bool> {
        self.session.read().await.subscribe()
    }

    /// Preview clip URL for a model.
    pub fn model_preview_url(&self, model: &Model) -> String {
        model.preview_url(&self.config.preview_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(RespeecherClient::new(ClientConfig::new("")).is_err());
        assert!(RespeecherClient::new(ClientConfig::new("gateway.respeecher.com")).is_err());
    }

    #[tokio::test]
    async fn test_endpoint_joins_paths() {
        let client = RespeecherClient::new(ClientConfig::new("https://example.com/api/")).unwrap();
        assert_eq!(client.endpoint(paths::LOGIN), "https://example.com/api/login");
        assert_eq!(
            client.endpoint(paths::CONVERSION_ORDER),
            "https://example.com/api/recordings/conversion-order"
        );
        assert!(!client.is_authenticated().await);
        assert_eq!(client.auth_state().await, AuthState::Unauthenticated);
    }
}
