//! Error types for the Respeecher client.

use crate::types::ValidationError;
use std::fmt;
use thiserror::Error;

/// HTTP status codes the Respeecher API is known to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Ok,
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    ValidationError,
    ServerError,
    /// Any status the API does not document
    Other(u16),
}

impl ResponseCode {
    pub fn as_u16(self) -> u16 {
        match self {
            ResponseCode::Ok => 200,
            ResponseCode::BadRequest => 400,
            ResponseCode::Unauthorized => 401,
            ResponseCode::PaymentRequired => 402,
            ResponseCode::Forbidden => 403,
            ResponseCode::NotFound => 404,
            ResponseCode::ValidationError => 422,
            ResponseCode::ServerError => 500,
            ResponseCode::Other(code) => code,
        }
    }

    /// Whether this status ends the authenticated session.
    pub fn is_auth_failure(self) -> bool {
        matches!(
            self,
            ResponseCode::Unauthorized | ResponseCode::PaymentRequired | ResponseCode::Forbidden
        )
    }
}

impl From<u16> for ResponseCode {
    fn from(code: u16) -> Self {
        match code {
            200 => ResponseCode::Ok,
            400 => ResponseCode::BadRequest,
            401 => ResponseCode::Unauthorized,
            402 => ResponseCode::PaymentRequired,
            403 => ResponseCode::Forbidden,
            404 => ResponseCode::NotFound,
            422 => ResponseCode::ValidationError,
            500 => ResponseCode::ServerError,
            other => ResponseCode::Other(other),
        }
    }
}

impl From<reqwest::StatusCode> for ResponseCode {
    fn from(status: reqwest::StatusCode) -> Self {
        ResponseCode::from(status.as_u16())
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Tag of a [`RespeecherError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UploadFailed,
    AuthFailed,
    RequestFailed,
    ValidationFailed,
    InvalidConfig,
    Storage,
}

/// Errors that can occur when talking to the Respeecher API.
///
/// Equality only looks at the variant: two `RequestFailed` errors compare
/// equal whatever their detail or status.
#[derive(Error, Debug, Clone)]
pub enum RespeecherError {
    /// Upload could not be sent (file unreadable, connection dropped)
    #[error("Upload failed{}", describe(.detail, .status))]
    UploadFailed {
        detail: Option<String>,
        status: Option<ResponseCode>,
    },

    /// Not authenticated, or the server rejected the session
    #[error("Authentication failed{}", describe(.detail, .status))]
    AuthFailed {
        detail: Option<String>,
        status: Option<ResponseCode>,
    },

    /// Request failed for any other reason
    #[error("Request failed{}", describe(.detail, .status))]
    RequestFailed {
        detail: Option<String>,
        status: Option<ResponseCode>,
    },

    /// Server rejected the request body field by field
    #[error("Validation failed ({} field errors)", .errors.len())]
    ValidationFailed {
        errors: Vec<ValidationError>,
        status: ResponseCode,
    },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Credential store could not be read or written
    #[error("Credential storage error: {0}")]
    Storage(String),
}

fn describe(detail: &Option<String>, status: &Option<ResponseCode>) -> String {
    match (detail, status) {
        (Some(detail), Some(status)) => format!(" ({}): {}", status, detail),
        (Some(detail), None) => format!(": {}", detail),
        (None, Some(status)) => format!(" ({})", status),
        (None, None) => String::new(),
    }
}

impl RespeecherError {
    pub fn auth_failed() -> Self {
        RespeecherError::AuthFailed {
            detail: None,
            status: None,
        }
    }

    pub fn request_failed(detail: impl Into<String>) -> Self {
        RespeecherError::RequestFailed {
            detail: Some(detail.into()),
            status: None,
        }
    }

    pub fn upload_failed(detail: impl Into<String>) -> Self {
        RespeecherError::UploadFailed {
            detail: Some(detail.into()),
            status: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RespeecherError::UploadFailed { .. } => ErrorKind::UploadFailed,
            RespeecherError::AuthFailed { .. } => ErrorKind::AuthFailed,
            RespeecherError::RequestFailed { .. } => ErrorKind::RequestFailed,
            RespeecherError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            RespeecherError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            RespeecherError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Human readable detail sent by the server, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RespeecherError::UploadFailed { detail, .. }
            | RespeecherError::AuthFailed { detail, .. }
            | RespeecherError::RequestFailed { detail, .. } => detail.as_deref(),
            RespeecherError::ValidationFailed { errors, .. } => {
                errors.first().map(|e| e.msg.as_str())
            }
            RespeecherError::InvalidConfig(msg) | RespeecherError::Storage(msg) => Some(msg),
        }
    }

    /// Status code of the response that caused this error.
    pub fn status(&self) -> Option<ResponseCode> {
        match self {
            RespeecherError::UploadFailed { status, .. }
            | RespeecherError::AuthFailed { status, .. }
            | RespeecherError::RequestFailed { status, .. } => *status,
            RespeecherError::ValidationFailed { status, .. } => Some(*status),
            RespeecherError::InvalidConfig(_) | RespeecherError::Storage(_) => None,
        }
    }
}

impl PartialEq for RespeecherError {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl Eq for RespeecherError {}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, RespeecherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_payload() {
        let a = RespeecherError::RequestFailed {
            detail: Some("one".into()),
            status: Some(ResponseCode::BadRequest),
        };
        let b = RespeecherError::RequestFailed {
            detail: None,
            status: Some(ResponseCode::ServerError),
        };
        assert_eq!(a, b);
        assert_ne!(a, RespeecherError::auth_failed());
    }

    #[test]
    fn test_response_code_mapping() {
        assert_eq!(ResponseCode::from(422), ResponseCode::ValidationError);
        assert_eq!(ResponseCode::from(418), ResponseCode::Other(418));
        assert_eq!(ResponseCode::Other(418).as_u16(), 418);
        assert!(ResponseCode::from(402).is_auth_failure());
        assert!(!ResponseCode::from(404).is_auth_failure());
    }

    #[test]
    fn test_display() {
        let error = RespeecherError::AuthFailed {
            detail: Some("Session expired".into()),
            status: Some(ResponseCode::Unauthorized),
        };
        assert_eq!(
            error.to_string(),
            "Authentication failed (401): Session expired"
        );
        assert_eq!(RespeecherError::auth_failed().to_string(), "Authentication failed");
    }
}
