//! API client with the bearer-token / refresh interceptor.
//!
//! Every request goes out with the current access token attached. A 401 on a
//! first attempt (with a real, non-placeholder token) funnels through the
//! [`RefreshGate`]: one refresh call total, queued peers replayed in arrival
//! order with the new token. 429 is surfaced immediately and never enters
//! the gate.

use std::sync::Arc;

use reqwest::Method;

use crate::api::auth::AuthTokens;
use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::error::{ApiError, server_message};
use crate::http::refresh::{RefreshGate, RefreshRole};
use crate::http::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use crate::session::{Session, SessionStore};

/// HTTP client for the admin API.
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    cache: ResponseCache,
    refresh_gate: RefreshGate,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Production client over reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        url::Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_transport(config, transport, SessionStore::new()))
    }

    /// Client over an arbitrary transport (tests inject scripted ones).
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: SessionStore,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            cache: ResponseCache::default(),
            refresh_gate: RefreshGate::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// GET, bypassing the cache.
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// GET through the short-TTL cache.
    pub async fn get_cached(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        if let Some(body) = self.cache.get(path).await {
            return Ok(body);
        }
        let body = self.execute(Method::GET, path, None).await?;
        self.cache.insert(path, body.clone()).await;
        Ok(body)
    }

    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.mutate(Method::POST, path, Some(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.mutate(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.mutate(Method::DELETE, path, None).await
    }

    async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let result = self.execute(method, path, body).await?;
        self.cache.invalidate_prefix(resource_prefix(path)).await;
        Ok(result)
    }

    /// Send one request through the interceptor.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut request = ApiRequest::new(method, self.url(path));
        request.bearer = self.session.access_token().await;
        request.body = body;

        let response = self.transport.send(request.clone()).await?;
        match classify(&response) {
            Outcome::Ok => Ok(response.body),
            Outcome::RateLimited => Err(ApiError::RateLimited),
            // A 401 from an auth endpoint is the server's final answer
            // (bad credentials, revoked refresh token), not a stale-token
            // signal: it never enters the gate.
            Outcome::Unauthorized if path.starts_with("/auth/") => {
                Err(ApiError::Unauthorized(server_message(&response.body)))
            }
            Outcome::Unauthorized => self.recover_unauthorized(request).await,
            Outcome::Failed(e) => Err(e),
        }
    }

    /// 401 path: refresh (or join an in-flight refresh) and replay once.
    async fn recover_unauthorized(
        &self,
        original: ApiRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let Some(session) = self.session.session().await else {
            return Err(ApiError::Unauthorized("no active session".into()));
        };
        // Provisional sessions have nothing to refresh with.
        if session.is_placeholder() {
            return Err(ApiError::Unauthorized("session pending verification".into()));
        }

        let access_token = match self.refresh_gate.join().await {
            RefreshRole::Follower(rx) => rx.await.map_err(|_| ApiError::SessionExpired)??,
            RefreshRole::Leader => match self.run_refresh(&session).await {
                Ok(tokens) => {
                    let token = tokens.access_token.clone();
                    self.session
                        .set(Session::new(
                            tokens.email,
                            tokens.user_id,
                            tokens.access_token,
                            tokens.refresh_token,
                        ))
                        .await;
                    self.refresh_gate.complete(&token).await;
                    token
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Token refresh failed; session expired");
                    self.session.mark_expired().await;
                    self.refresh_gate.fail().await;
                    return Err(ApiError::SessionExpired);
                }
            },
        };

        let mut retry = original;
        retry.bearer = Some(access_token);
        let response = self.transport.send(retry).await?;
        match classify(&response) {
            Outcome::Ok => Ok(response.body),
            Outcome::RateLimited => Err(ApiError::RateLimited),
            // The freshly minted token was rejected; nothing left to try.
            Outcome::Unauthorized => {
                self.session.mark_expired().await;
                Err(ApiError::SessionExpired)
            }
            Outcome::Failed(e) => Err(e),
        }
    }

    async fn run_refresh(&self, session: &Session) -> Result<AuthTokens, ApiError> {
        use secrecy::ExposeSecret;

        let mut request = ApiRequest::new(Method::POST, self.url("/auth/admin/refresh"));
        request.body = Some(serde_json::json!({
            "refresh_token": session.refresh_token.expose_secret(),
        }));

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                message: server_message(&response.body),
            });
        }
        Ok(serde_json::from_value(response.body)?)
    }
}

enum Outcome {
    Ok,
    Unauthorized,
    RateLimited,
    Failed(ApiError),
}

fn classify(response: &ApiResponse) -> Outcome {
    match response.status {
        s if (200..300).contains(&s) => Outcome::Ok,
        401 => Outcome::Unauthorized,
        429 => Outcome::RateLimited,
        s => Outcome::Failed(ApiError::Server {
            status: s,
            message: server_message(&response.body),
        }),
    }
}

/// First path segment, used as the cache-invalidation prefix.
/// `/wallet/w1/users` → `/wallet`.
fn resource_prefix(path: &str) -> &str {
    match path.strip_prefix('/') {
        Some(rest) => match rest.find('/') {
            Some(end) => &path[..end + 1],
            None => path,
        },
        None => path,
    }
}
