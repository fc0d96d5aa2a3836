//! Interceptor behavior under auth failures: single-flight refresh, FIFO
//! replay, 429 passthrough, placeholder sessions, and refresh failure.

mod common;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use common::{ScriptedTransport, client_with, fresh_tokens_body, response, seed_session};
use ndis_admin::error::ApiError;
use ndis_admin::http::{ApiClient, ApiRequest, ApiResponse, Transport};

/// Transport for the 401-storm test: every stale-token request 401s, and
/// the refresh response is withheld until all `expected` requests have
/// failed, so the whole storm is queued behind one refresh.
struct StormTransport {
    expected: usize,
    stale_401s: AtomicUsize,
    refresh_calls: AtomicUsize,
    first_failures: Mutex<Vec<String>>,
    replays: Mutex<Vec<String>>,
}

impl StormTransport {
    fn new(expected: usize) -> Arc<Self> {
        Arc::new(Self {
            expected,
            stale_401s: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            first_failures: Mutex::new(Vec::new()),
            replays: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Transport for StormTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.url.ends_with("/auth/admin/refresh") {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            while self.stale_401s.load(Ordering::SeqCst) < self.expected {
                tokio::task::yield_now().await;
            }
            return Ok(response(200, fresh_tokens_body()));
        }
        match request.bearer.as_deref() {
            Some("stale-token") => {
                self.first_failures.lock().unwrap().push(request.url.clone());
                self.stale_401s.fetch_add(1, Ordering::SeqCst);
                Ok(response(401, json!({"message": "jwt expired"})))
            }
            Some("fresh-token") => {
                self.replays.lock().unwrap().push(request.url.clone());
                Ok(response(200, json!({"url": request.url})))
            }
            other => panic!("unexpected bearer {other:?}"),
        }
    }
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh_and_replay_in_order() {
    const N: usize = 5;
    let transport = StormTransport::new(N);
    let client = Arc::new(client_with(transport.clone()));
    seed_session(&client, "stale-token").await;

    let requests = (0..N).map(|i| {
        let client = Arc::clone(&client);
        async move { client.get(&format!("/user/{i}")).await }
    });
    let results = futures::future::join_all(requests).await;

    for result in results {
        result.expect("request should succeed after refresh");
    }
    assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);

    // Replays use the refreshed token and preserve arrival order.
    let failures = transport.first_failures.lock().unwrap().clone();
    let replays = transport.replays.lock().unwrap().clone();
    assert_eq!(failures.len(), N);
    assert_eq!(replays, failures);

    // Session was replaced wholesale with the refreshed pair.
    let session = client.session().session().await.unwrap();
    assert_eq!(session.access_token, "fresh-token");
    assert!(!client.session().is_expired().await);
}

#[tokio::test]
async fn rate_limit_is_surfaced_immediately_and_never_retried() {
    let transport = ScriptedTransport::new(|_request, _index| {
        response(429, json!({"message": "Too many requests"}))
    });
    let client = client_with(transport.clone());
    seed_session(&client, "some-token").await;

    let err = client.get("/transactions").await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited));
    // One request total: no retry, no refresh attempt.
    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.refresh_calls(), 0);
}

#[tokio::test]
async fn placeholder_token_rejects_without_refresh() {
    let transport = ScriptedTransport::new(|_request, _index| {
        response(401, json!({"message": "unauthorized"}))
    });
    let client = client_with(transport.clone());
    seed_session(&client, "temporary").await;

    let err = client.get("/user").await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.refresh_calls(), 0);
    assert!(!client.session().is_expired().await);
}

#[tokio::test]
async fn failed_login_bypasses_the_refresh_gate() {
    // Wrong password while a live session exists: the credential error
    // must surface as-is, without burning a refresh or touching the
    // session.
    let transport = ScriptedTransport::new(|request, _index| {
        if request.url.ends_with("/auth/admin/login") {
            return response(401, json!({"message": "Invalid credentials"}));
        }
        panic!("unexpected request to {}", request.url);
    });
    let client = client_with(transport.clone());
    seed_session(&client, "live-token").await;

    let password = secrecy::SecretString::from("wrong".to_string());
    let err = client
        .auth()
        .login("admin@example.com", &password)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Invalid credentials"));
    assert_eq!(transport.refresh_calls(), 0);
    assert!(!client.session().is_expired().await);
    assert_eq!(
        client.session().access_token().await.as_deref(),
        Some("live-token")
    );
}

#[tokio::test]
async fn expired_token_recovers_transparently_with_one_refresh() {
    let transport = ScriptedTransport::new(|request, _index| {
        if request.url.ends_with("/auth/admin/refresh") {
            return response(200, fresh_tokens_body());
        }
        match request.bearer.as_deref() {
            Some("stale-token") => response(401, serde_json::Value::Null),
            Some("fresh-token") => response(200, json!({"id": "w-1", "name": "Core", "balance": "10.00"})),
            _ => response(401, serde_json::Value::Null),
        }
    });
    let client = client_with(transport.clone());
    seed_session(&client, "stale-token").await;

    let wallet = client.wallets().get("w-1").await.unwrap();
    assert_eq!(wallet.id, "w-1");
    assert_eq!(transport.refresh_calls(), 1);
}

#[tokio::test]
async fn refresh_failure_expires_session_and_rejects_waiters() {
    const N: usize = 3;

    struct FailingRefresh {
        expected: usize,
        stale_401s: AtomicUsize,
        refresh_calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for FailingRefresh {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            if request.url.ends_with("/auth/admin/refresh") {
                self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                while self.stale_401s.load(Ordering::SeqCst) < self.expected {
                    tokio::task::yield_now().await;
                }
                return Ok(response(401, json!({"message": "refresh token revoked"})));
            }
            self.stale_401s.fetch_add(1, Ordering::SeqCst);
            Ok(response(401, serde_json::Value::Null))
        }
    }

    let transport = Arc::new(FailingRefresh {
        expected: N,
        stale_401s: AtomicUsize::new(0),
        refresh_calls: AtomicUsize::new(0),
    });
    let client = Arc::new(client_with(transport.clone()));
    seed_session(&client, "stale-token").await;

    let requests = (0..N).map(|i| {
        let client = Arc::clone(&client);
        async move { client.get(&format!("/card/{i}")).await }
    });
    let results = futures::future::join_all(requests).await;

    for result in results {
        assert!(matches!(result.unwrap_err(), ApiError::SessionExpired));
    }
    assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);

    // Expired, not logged out: the session record is retained.
    assert!(client.session().is_expired().await);
    assert!(client.session().session().await.is_some());
}

#[tokio::test]
async fn gate_reopens_after_a_failed_refresh() {
    // First round fails the refresh; after re-login a request succeeds.
    let transport = ScriptedTransport::new(|request, _index| {
        if request.url.ends_with("/auth/admin/refresh") {
            return response(500, json!({"message": "boom"}));
        }
        match request.bearer.as_deref() {
            Some("stale-token") => response(401, serde_json::Value::Null),
            _ => response(200, json!([])),
        }
    });
    let client = client_with(transport.clone());
    seed_session(&client, "stale-token").await;

    let err = client.get("/user").await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));

    seed_session(&client, "good-token").await;
    assert!(!client.session().is_expired().await);
    client.get("/user").await.unwrap();
}

fn _assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn client_futures_are_send() {
    // The embedding runtime spawns these onto a multi-threaded executor.
    let transport = ScriptedTransport::new(|_r, _i| response(200, json!([])));
    let client: ApiClient = client_with(transport);
    let fut = client.get("/user");
    _assert_send(&fut);
    drop(fut);
}
