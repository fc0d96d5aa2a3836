//! Transaction endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::{ListQuery, Page, fetch_one, fetch_page};
use crate::error::ApiError;
use crate::http::ApiClient;

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Declined,
    Reversed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub wallet_id: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub wallet_id: String,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// `/transactions` endpoints.
pub struct TransactionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TransactionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Transaction>, ApiError> {
        fetch_page(self.client, "/transactions", query).await
    }

    pub async fn get(&self, id: &str) -> Result<Transaction, ApiError> {
        fetch_one(self.client, &format!("/transactions/{id}")).await
    }

    pub async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, ApiError> {
        let body = self
            .client
            .post("/transactions", serde_json::to_value(transaction)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn update(
        &self,
        id: &str,
        update: &TransactionUpdate,
    ) -> Result<Transaction, ApiError> {
        let body = self
            .client
            .patch(&format!("/transactions/{id}"), serde_json::to_value(update)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/transactions/{id}")).await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> Result<Transaction, ApiError> {
        let body = self
            .client
            .patch(
                &format!("/transactions/{id}/status"),
                serde_json::json!({ "status": status }),
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}
