//! Session cookie handling.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// A cookie in a form that can be written to the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// Expiry in seconds since the Unix epoch. `None` for session cookies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl CookieRecord {
    pub(crate) fn from_cookie(cookie: &reqwest::cookie::Cookie<'_>) -> Self {
        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            secure: cookie.secure(),
            http_only: cookie.http_only(),
            // Max-Age wins over Expires when both are set
            expires_at: match cookie.max_age() {
                Some(age) => Some(unix_now().saturating_add(age.as_secs())),
                None => cookie
                    .expires()
                    .map(|at| at.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())),
            },
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= unix_now())
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_set_cookie(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);
        if let Some(domain) = &self.domain {
            header.push_str("; Domain=");
            header.push_str(domain);
        }
        header.push_str("; Path=");
        header.push_str(self.path.as_deref().unwrap_or("/"));
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if let Some(at) = self.expires_at {
            header.push_str(&format!("; Max-Age={}", at.saturating_sub(unix_now())));
        }
        header
    }
}

/// Cookie provider for the HTTP client that can be emptied on logout.
#[derive(Debug, Default)]
pub struct SessionCookieJar {
    jar: RwLock<Jar>,
}

impl SessionCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay stored cookies as if `url` had set them. Expired ones are skipped.
    pub fn restore(&self, records: &[CookieRecord], url: &Url) {
        let jar = self.jar.read().unwrap_or_else(|e| e.into_inner());
        for record in records.iter().filter(|r| !r.is_expired()) {
            jar.add_cookie_str(&record.to_set_cookie(), url);
        }
    }

    pub fn clear(&self) {
        let mut jar = self.jar.write().unwrap_or_else(|e| e.into_inner());
        *jar = Jar::default();
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let jar = self.jar.read().unwrap_or_else(|e| e.into_inner());
        jar.set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let jar = self.jar.read().unwrap_or_else(|e| e.into_inner());
        jar.cookies(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CookieRecord {
        CookieRecord {
            name: "sessionid".into(),
            value: "abc123".into(),
            domain: None,
            path: Some("/".into()),
            secure: false,
            http_only: true,
            expires_at: None,
        }
    }

    #[test]
    fn test_set_cookie_rendering() {
        assert_eq!(record().to_set_cookie(), "sessionid=abc123; Path=/; HttpOnly");
    }

    #[test]
    fn test_expiry() {
        let live = CookieRecord {
            expires_at: Some(unix_now() + 3600),
            ..record()
        };
        assert!(!live.is_expired());
        let rendered = live.to_set_cookie();
        assert!(rendered.starts_with("sessionid=abc123; Path=/; HttpOnly; Max-Age="));

        let dead = CookieRecord {
            expires_at: Some(unix_now().saturating_sub(1)),
            ..record()
        };
        assert!(dead.is_expired());
        assert!(!record().is_expired());
    }

    #[test]
    fn test_restore_and_clear() {
        let url = Url::parse("https://gateway.example.com/api/").unwrap();
        let jar = SessionCookieJar::new();
        assert!(jar.cookies(&url).is_none());

        jar.restore(&[record()], &url);
        let header = jar.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "sessionid=abc123");

        jar.clear();
        assert!(jar.cookies(&url).is_none());
    }

    #[test]
    fn test_restore_skips_expired() {
        let url = Url::parse("https://gateway.example.com/api/").unwrap();
        let jar = SessionCookieJar::new();
        let expired = CookieRecord {
            expires_at: Some(0),
            ..record()
        };

        jar.restore(&[expired], &url);
        assert!(jar.cookies(&url).is_none());
    }
}
