//! Session store — the single shared mutable resource in the client.
//!
//! Holds the credential pair for the signed-in admin. The record is always
//! replaced wholesale (login, register, refresh), never merged field by
//! field, so concurrent readers can only ever observe a complete session.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

/// Access token value used for provisional (pre-verification) sessions.
///
/// A 401 carrying this token must never trigger a refresh attempt.
pub const PLACEHOLDER_TOKEN: &str = "temporary";

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: SecretString,
}

impl Session {
    pub fn new(
        email: impl Into<String>,
        user_id: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            user_id: user_id.into(),
            access_token: access_token.into(),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    /// Whether this session carries the provisional placeholder token.
    pub fn is_placeholder(&self) -> bool {
        self.access_token == PLACEHOLDER_TOKEN
    }
}

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    /// Refresh failed; distinct from logged-out so in-page state survives
    /// until the user re-authenticates.
    expired: bool,
}

/// Shared session store. Cheap to clone; all clones see the same state.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session wholesale. Clears any expired flag.
    pub async fn set(&self, session: Session) {
        let mut inner = self.inner.write().await;
        inner.session = Some(session);
        inner.expired = false;
    }

    /// Log out: drop the session and the expired flag.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.session = None;
        inner.expired = false;
    }

    /// Snapshot of the current session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.inner.read().await.session.clone()
    }

    /// Current access token, if a session exists.
    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Current refresh token, exposed for the refresh call only.
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .session
            .as_ref()
            .map(|s| s.refresh_token.expose_secret().to_string())
    }

    /// Mark the session expired without discarding it.
    pub async fn mark_expired(&self) {
        self.inner.write().await.expired = true;
    }

    pub async fn is_expired(&self) -> bool {
        self.inner.read().await.expired
    }

    /// Whether the current session (if any) holds the placeholder token.
    pub async fn is_placeholder(&self) -> bool {
        self.inner
            .read()
            .await
            .session
            .as_ref()
            .is_some_and(Session::is_placeholder)
    }
}
