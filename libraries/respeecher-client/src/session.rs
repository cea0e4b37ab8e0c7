//! In-memory session state owned by a client instance.

use crate::types::User;
use tokio::sync::watch;

/// Where the client is in the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

#[derive(Debug)]
pub(crate) struct Session {
    pub token: String,
    pub authenticated: bool,
    pub authenticating: bool,
    pub user: Option<User>,
    notifier: watch::Sender<bool>,
}

impl Session {
    pub fn new(token: String, authenticated: bool) -> Self {
        let (notifier, _) = watch::channel(authenticated);
        Self {
            token,
            authenticated,
            authenticating: false,
            user: None,
            notifier,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.authenticating {
            AuthState::Authenticating
        } else if self.authenticated {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Update the flag, notifying watchers on change.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        self.notifier.send_if_modified(|current| {
            let changed = *current != authenticated;
            *current = authenticated;
            changed
        });
    }

    /// Drop the session after the server refused it.
    pub fn deauthenticate(&mut self) {
        self.set_authenticated(false);
        self.user = None;
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.notifier.subscribe()
    }
}
