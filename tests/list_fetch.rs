//! List-fetch semantics through the full client: shape normalization,
//! caching, and the no-retry 5xx degradation.

mod common;

use rust_decimal_macros::dec;
use serde_json::json;

use common::{ScriptedTransport, client_with, response, seed_session};
use ndis_admin::api::{ListQuery, SortOrder};
use ndis_admin::error::ApiError;

#[tokio::test]
async fn wallet_list_503_returns_empty_without_retry() {
    let transport = ScriptedTransport::new(|_request, _index| {
        response(503, json!({"message": "Service unavailable"}))
    });
    let client = client_with(transport.clone());
    seed_session(&client, "tok").await;

    let page = client.wallets().list(&ListQuery::default()).await.unwrap();
    assert!(page.is_empty());
    // Exactly one attempt: a failing backend is not hammered.
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn detail_fetch_5xx_still_propagates() {
    let transport =
        ScriptedTransport::new(|_request, _index| response(500, json!({"message": "boom"})));
    let client = client_with(transport);
    seed_session(&client, "tok").await;

    let err = client.wallets().get("w-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 500, .. }));
}

#[tokio::test]
async fn both_list_shapes_normalize() {
    let transport = ScriptedTransport::new(|request, _index| {
        if request.url.contains("/wallet") {
            // Bare array shape.
            response(
                200,
                json!([{"id": "w-1", "name": "Core", "balance": "250.00"}]),
            )
        } else {
            // Wrapped shape with meta.
            response(
                200,
                json!({
                    "data": [{"id": "t-1", "walletId": "w-1", "amount": "9.90", "status": "approved"}],
                    "meta": {"page": 1, "limit": 20, "total": 1, "totalPages": 1}
                }),
            )
        }
    });
    let client = client_with(transport);
    seed_session(&client, "tok").await;

    let wallets = client.wallets().list(&ListQuery::default()).await.unwrap();
    assert_eq!(wallets.items[0].balance, dec!(250.00));
    assert!(wallets.meta.is_none());

    let transactions = client
        .transactions()
        .list(&ListQuery::default().page(1).limit(20))
        .await
        .unwrap();
    assert_eq!(transactions.items[0].amount, dec!(9.90));
    assert_eq!(transactions.meta.unwrap().total, Some(1));
}

#[tokio::test]
async fn list_fetches_are_cached_and_mutations_invalidate() {
    let transport = ScriptedTransport::new(|request, _index| {
        if request.method.as_str() == "POST" {
            response(201, json!({"id": "w-2", "name": "New", "balance": "0.00"}))
        } else {
            response(200, json!([{"id": "w-1", "name": "Core", "balance": "1.00"}]))
        }
    });
    let client = client_with(transport.clone());
    seed_session(&client, "tok").await;

    let query = ListQuery::default().sort("createdAt", SortOrder::Desc);
    client.wallets().list(&query).await.unwrap();
    client.wallets().list(&query).await.unwrap();
    // Second fetch was served from cache.
    assert_eq!(transport.call_count(), 1);

    // A wallet mutation drops the cached list.
    client
        .wallets()
        .create(&ndis_admin::api::wallets::NewWallet {
            name: "New".into(),
            owner_id: None,
        })
        .await
        .unwrap();
    client.wallets().list(&query).await.unwrap();
    assert_eq!(transport.call_count(), 3);
}
