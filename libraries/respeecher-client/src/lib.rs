//! Respeecher API Client
//!
//! HTTP client library for the Respeecher voice conversion API.
//!
//! # Features
//!
//! - **Authentication**: Login with email/password, CSRF token + session
//!   cookies persisted through a [`CredentialStore`]
//! - **Projects & phrases**: Create, list, update and delete
//! - **Recordings**: Upload takes with progress, order conversions, download
//!   results with progress
//! - **Models, calibrations & TTS voices**
//!
//! Every failure is a [`RespeecherError`]. A 401, 402 or 403 from any
//! endpoint signs the client out; later calls fail with `AuthFailed` until
//! the next [`RespeecherClient::login`].
//!
//! # Example
//!
//! ```ignore
//! use respeecher_client::{ClientConfig, FileCredentialStore, RespeecherClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::load(None)?;
//!     let store = Arc::new(FileCredentialStore::new(&config.credentials_path));
//!     let client = RespeecherClient::with_store(config, store).await?;
//!
//!     if !client.is_authenticated().await {
//!         client.login("user@example.com", "password").await?;
//!     }
//!
//!     for model in client.fetch_models().await? {
//!         println!("{} -> {}", model.name, client.model_preview_url(&model));
//!     }
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod calibrations;
mod client;
mod config;
mod cookies;
mod download;
mod error;
mod models;
mod phrases;
mod projects;
mod recordings;
mod request;
mod session;
mod store;
mod types;
mod upload;
mod voices;

pub use client::RespeecherClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_PREVIEW_URL};
pub use cookies::{CookieRecord, SessionCookieJar};
pub use error::{ErrorKind, RespeecherError, ResponseCode, Result};
pub use request::CSRF_HEADER;
pub use session::AuthState;
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredentials, COOKIE_KEY,
    TOKEN_KEY,
};
pub use types::{
    AudioUpload, Calibration, ErrorResponse, Group, LocSegment, LoginResponse, Model, ModelParam,
    Page, Pagination, ParamValue, Phrase, Project, ProjectFilter, Recording, User,
    ValidationError, ValidationErrorResponse, Voice, VoiceResponse, SUPPORTED_EXTENSIONS,
};
