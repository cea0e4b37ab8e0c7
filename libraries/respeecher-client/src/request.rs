//! Authenticated request pipeline and response classification.

use crate::client::RespeecherClient;
use crate::error::{RespeecherError, ResponseCode, Result};
use crate::types::{ErrorResponse, ValidationErrorResponse};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Header carrying the CSRF token on every authenticated request.
pub const CSRF_HEADER: &str = "x-csrf-token";

impl RespeecherClient {
    /// Token of the current session, or `AuthFailed` when signed out.
    pub(crate) async fn require_token(&self) -> Result<String> {
        let session = self.session.read().await;
        if !session.authenticated {
            debug!("Rejecting request: not authenticated");
            return Err(RespeecherError::auth_failed());
        }
        Ok(session.token.clone())
    }

    /// Start an authenticated request to an endpoint path.
    pub(crate) async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.require_token().await?;
        let token = HeaderValue::from_str(&token).map_err(|_| RespeecherError::AuthFailed {
            detail: Some("Stored token is not a valid header value".into()),
            status: None,
        })?;

        let url = self.endpoint(path);
        debug!(method = %method, url = %url, "Sending request");

        Ok(self
            .http
            .request(method, url)
            .header(CSRF_HEADER, token)
            .header(ACCEPT, "application/json"))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.authorized(Method::GET, path).await?;
        self.dispatch(builder).await
    }

    /// GET with the parameters URL-encoded into the query string.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.authorized(Method::GET, path).await?;
        self.dispatch(builder.query(query)).await
    }

    /// Request with the parameters encoded as a JSON body.
    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.authorized(method, path).await?;
        self.dispatch(builder.json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.authorized(Method::DELETE, path).await?;
        self.dispatch(builder).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            debug!(error = %e, "Transport error");
            RespeecherError::request_failed(e.to_string())
        })?;
        self.handle_response(response).await
    }

    /// Decode a successful response or turn a failed one into an error.
    pub(crate) async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let code = ResponseCode::from(status);
        let body = response.bytes().await.map_err(|e| RespeecherError::RequestFailed {
            detail: Some(e.to_string()),
            status: Some(code),
        })?;

        if status.as_u16() < 400 {
            return serde_json::from_slice(&body).map_err(|e| {
                debug!(status = %status, error = %e, "Failed to decode response");
                RespeecherError::RequestFailed {
                    detail: Some(format!("Failed to parse response: {}", e)),
                    status: Some(code),
                }
            });
        }

        Err(self.fail(status.as_u16(), &body).await)
    }

    /// Classify a failed response, signing out on auth failures.
    pub(crate) async fn fail(&self, status: u16, body: &[u8]) -> RespeecherError {
        let error = classify(status, body);
        if error.kind() == crate::ErrorKind::AuthFailed {
            warn!(status, "Server rejected session, signing out");
            self.session.write().await.deauthenticate();
        } else {
            debug!(status, error = %error, "Request failed");
        }
        error
    }
}

/// Map a failed status and its body to an error.
pub(crate) fn classify(status: u16, body: &[u8]) -> RespeecherError {
    let code = ResponseCode::from(status);

    if code == ResponseCode::ValidationError {
        return match serde_json::from_slice::<ValidationErrorResponse>(body) {
            Ok(response) => RespeecherError::ValidationFailed {
                errors: response.detail,
                status: code,
            },
            Err(_) => RespeecherError::RequestFailed {
                detail: None,
                status: Some(code),
            },
        };
    }

    let detail = serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .map(|e| e.detail);

    if code.is_auth_failure() {
        RespeecherError::AuthFailed {
            detail,
            status: Some(code),
        }
    } else {
        RespeecherError::RequestFailed {
            detail,
            status: Some(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocSegment;

    #[test]
    fn test_auth_statuses() {
        for status in [401, 402, 403] {
            let error = classify(status, br#"{"detail": "nope"}"#);
            assert_eq!(error, RespeecherError::auth_failed());
            assert_eq!(error.detail(), Some("nope"));
            assert_eq!(error.status(), Some(ResponseCode::from(status)));
        }
    }

    #[test]
    fn test_request_failures_keep_detail() {
        let error = classify(404, br#"{"detail": "Not found"}"#);
        assert_eq!(error.kind(), crate::ErrorKind::RequestFailed);
        assert_eq!(error.detail(), Some("Not found"));
        assert_eq!(error.status(), Some(ResponseCode::NotFound));

        let error = classify(503, b"<html>Bad gateway</html>");
        assert_eq!(error.detail(), None);
        assert_eq!(error.status(), Some(ResponseCode::Other(503)));
    }

    #[test]
    fn test_validation_body() {
        let body = br#"{"detail": [{"loc": ["body", "name"], "msg": "field required", "type": "value_error.missing"}]}"#;
        match classify(422, body) {
            RespeecherError::ValidationFailed { errors, status } => {
                assert_eq!(status, ResponseCode::ValidationError);
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].loc[1], LocSegment::Field("name".into()));
                assert_eq!(errors[0].msg, "field required");
            }
            e => panic!("Expected ValidationFailed, got: {:?}", e),
        }
    }

    #[test]
    fn test_undecodable_validation_body() {
        let error = classify(422, br#"{"detail": "plain"}"#);
        assert_eq!(error.kind(), crate::ErrorKind::RequestFailed);
        assert_eq!(error.status(), Some(ResponseCode::ValidationError));
    }
}
