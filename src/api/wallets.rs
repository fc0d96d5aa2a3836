//! Wallet endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::{ListQuery, Page, fetch_one, fetch_page};
use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `/wallet` endpoints.
pub struct WalletsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WalletsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Wallet>, ApiError> {
        fetch_page(self.client, "/wallet", query).await
    }

    pub async fn get(&self, id: &str) -> Result<Wallet, ApiError> {
        fetch_one(self.client, &format!("/wallet/{id}")).await
    }

    pub async fn create(&self, wallet: &NewWallet) -> Result<Wallet, ApiError> {
        let body = self
            .client
            .post("/wallet", serde_json::to_value(wallet)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn update(&self, id: &str, update: &WalletUpdate) -> Result<Wallet, ApiError> {
        let body = self
            .client
            .patch(&format!("/wallet/{id}"), serde_json::to_value(update)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/wallet/{id}")).await?;
        Ok(())
    }

    /// Grant a user access to a wallet.
    pub async fn add_user(&self, wallet_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.client
            .post(
                &format!("/wallet/{wallet_id}/users"),
                serde_json::json!({ "userId": user_id }),
            )
            .await?;
        Ok(())
    }

    /// Revoke a user's access to a wallet.
    pub async fn remove_user(&self, wallet_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/wallet/{wallet_id}/users/{user_id}"))
            .await?;
        Ok(())
    }
}
