//! Shared test plumbing: a scripted transport and client builders.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use ndis_admin::config::ClientConfig;
use ndis_admin::error::ApiError;
use ndis_admin::http::{ApiClient, ApiRequest, ApiResponse, Transport};
use ndis_admin::session::{Session, SessionStore};

pub const BASE_URL: &str = "https://api.example.com";

type Responder = Box<dyn Fn(&ApiRequest, usize) -> ApiResponse + Send + Sync>;

/// Transport that answers from a closure and records every request.
pub struct ScriptedTransport {
    responder: Responder,
    calls: Mutex<Vec<ApiRequest>>,
    counter: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(&ApiRequest, usize) -> ApiResponse + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
        })
    }

    /// Every request seen so far, in arrival order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// How many refresh-endpoint calls went out.
    pub fn refresh_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with("/auth/admin/refresh"))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(request.clone());
        Ok((self.responder)(&request, index))
    }
}

pub fn client_with(transport: Arc<dyn Transport>) -> ApiClient {
    ApiClient::with_transport(ClientConfig::new(BASE_URL), transport, SessionStore::new())
}

/// Install a session with the given access token and a valid refresh token.
pub async fn seed_session(client: &ApiClient, access_token: &str) {
    client
        .session()
        .set(Session::new(
            "admin@example.com",
            "u-1",
            access_token,
            "refresh-1",
        ))
        .await;
}

pub fn response(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse { status, body }
}

/// Body returned by a successful refresh call.
pub fn fresh_tokens_body() -> serde_json::Value {
    json!({
        "access_token": "fresh-token",
        "refresh_token": "rotated-refresh",
        "email": "admin@example.com",
        "userId": "u-1",
    })
}
