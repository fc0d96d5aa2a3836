//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::session::Session;

/// Token pair (plus identity) returned by login, register, and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl AuthTokens {
    pub fn into_session(self) -> Session {
        Session::new(self.email, self.user_id, self.access_token, self.refresh_token)
    }
}

/// `/auth/admin/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and install the returned session.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthTokens, ApiError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response = self.client.post("/auth/admin/login", body).await?;
        let tokens: AuthTokens = serde_json::from_value(response)?;
        self.client.session().set(tokens.clone().into_session()).await;
        Ok(tokens)
    }

    /// Register a new admin account and install the returned session.
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        first_name: &str,
        last_name: &str,
    ) -> Result<AuthTokens, ApiError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "firstName": first_name,
            "lastName": last_name,
        });
        let response = self.client.post("/auth/admin/register", body).await?;
        let tokens: AuthTokens = serde_json::from_value(response)?;
        self.client.session().set(tokens.clone().into_session()).await;
        Ok(tokens)
    }

    /// Exchange the stored refresh token for a new session pair.
    ///
    /// The interceptor refreshes on its own when a request 401s; this is
    /// for callers that want to renew proactively.
    pub async fn refresh(&self) -> Result<AuthTokens, ApiError> {
        let Some(refresh_token) = self.client.session().refresh_token().await else {
            return Err(ApiError::Unauthorized("no session to refresh".into()));
        };
        let body = json!({ "refresh_token": refresh_token });
        let response = self.client.post("/auth/admin/refresh", body).await?;
        let tokens: AuthTokens = serde_json::from_value(response)?;
        self.client.session().set(tokens.clone().into_session()).await;
        Ok(tokens)
    }

    /// Client-side logout: drops the session and every cached response.
    pub async fn logout(&self) {
        self.client.session().clear().await;
        self.client.cache().clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_decode_with_user_id_alias() {
        let tokens: AuthTokens = serde_json::from_value(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "email": "admin@example.com",
            "userId": "u-7",
        }))
        .unwrap();
        assert_eq!(tokens.user_id, "u-7");

        let session = tokens.into_session();
        assert_eq!(session.access_token, "at");
        assert_eq!(session.email, "admin@example.com");
    }
}
