/// Client configuration
use crate::error::{RespeecherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://gateway.respeecher.com/api";

/// Where model preview clips are published.
pub const DEFAULT_PREVIEW_URL: &str = "https://gateway.respeecher.com/static/previews/";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_preview_url")]
    pub preview_url: String,

    /// Directory downloaded recordings are written to
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// File the session token and cookies are persisted in
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    /// Config pointing at `base_url`, everything else default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = url.into();
        self
    }

    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables use the `RESPEECHER_` prefix, e.g.
    /// `RESPEECHER_BASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        } else {
            let default_path = PathBuf::from("respeecher.toml");
            if default_path.exists() {
                settings = settings.add_source(config::File::from(default_path));
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("RESPEECHER")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| RespeecherError::InvalidConfig(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| RespeecherError::InvalidConfig(e.to_string()))
    }

    /// Validate and normalize the base URL.
    pub(crate) fn normalized(mut self) -> Result<Self> {
        if self.base_url.is_empty() {
            return Err(RespeecherError::InvalidConfig(
                "Base URL cannot be empty".into(),
            ));
        }

        let url = self.base_url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RespeecherError::InvalidConfig(
                "Base URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| RespeecherError::InvalidConfig(e.to_string()))?;

        self.base_url = url;
        Ok(self)
    }
}

// Default values
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_preview_url() -> String {
    DEFAULT_PREVIEW_URL.to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from(".respeecher/credentials.json")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            preview_url: default_preview_url(),
            download_dir: default_download_dir(),
            credentials_path: default_credentials_path(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
