//! Login and logout.

use crate::client::{paths, RespeecherClient};
use crate::cookies::CookieRecord;
use crate::error::{RespeecherError, ResponseCode, Result};
use crate::request::classify;
use crate::types::{LoginRequest, LoginResponse, User};
use tracing::{debug, info, warn};

impl RespeecherClient {
    /// Login with email and password.
    ///
    /// Any previous session is dropped first. On success the CSRF token and
    /// the session cookies are persisted and the user is returned; on failure
    /// the client stays signed out.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        {
            let mut session = self.session.write().await;
            session.authenticating = true;
            session.user = None;
            session.set_authenticated(false);
        }

        self.cookies.clear();
        if let Err(e) = self.store.clear_cookies().await {
            warn!(error = %e, "Failed to clear stored cookies");
        }

        let result = self.request_login(username, password).await;

        let mut session = self.session.write().await;
        session.authenticating = false;

        let (response, cookies) = match result {
            Ok(ok) => ok,
            Err(e) => {
                warn!(username = %username, error = %e, "Login failed");
                return Err(e);
            }
        };

        session.token = response.csrf_token.clone();
        session.user = Some(response.user.clone());
        session.set_authenticated(true);
        drop(session);

        if let Err(e) = self.store.save_cookies(&cookies).await {
            warn!(error = %e, "Failed to persist session cookies");
        }
        if let Err(e) = self.store.save_token(&response.csrf_token).await {
            warn!(error = %e, "Failed to persist token");
        }

        info!(
            username = %response.user.username,
            user_id = %response.user.id,
            cookies = cookies.len(),
            "Login successful"
        );

        Ok(response.user)
    }

    async fn request_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(LoginResponse, Vec<CookieRecord>)> {
        let url = self.endpoint(paths::LOGIN);
        debug!(url = %url, username = %username, "Attempting login");

        let request = LoginRequest {
            email: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RespeecherError::request_failed(e.to_string()))?;

        let status = response.status();
        let cookies: Vec<CookieRecord> = response
            .cookies()
            .map(|c| CookieRecord::from_cookie(&c))
            .filter(|c| !c.is_expired())
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| RespeecherError::request_failed(e.to_string()))?;

        if status.as_u16() >= 400 {
            return Err(classify(status.as_u16(), &body));
        }

        let login_response: LoginResponse = serde_json::from_slice(&body).map_err(|e| {
            RespeecherError::RequestFailed {
                detail: Some(format!("Failed to parse login response: {}", e)),
                status: Some(ResponseCode::from(status)),
            }
        })?;

        Ok((login_response, cookies))
    }

    /// Sign out, forgetting the token, cookies and user.
    ///
    /// Returns `false` without touching anything when already signed out or
    /// while a login is in flight.
    pub async fn logout(&self) -> bool {
        {
            let mut session = self.session.write().await;
            if !session.authenticated || session.authenticating {
                return false;
            }
            session.set_authenticated(false);
            session.token.clear();
            session.user = None;
        }

        self.cookies.clear();
        if let Err(e) = self.store.clear_cookies().await {
            warn!(error = %e, "Failed to clear stored cookies");
        }
        if let Err(e) = self.store.clear_token().await {
            warn!(error = %e, "Failed to clear stored token");
        }

        info!("Logged out");
        true
    }
}
