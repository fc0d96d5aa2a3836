//! Subscription endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::Page;
use crate::error::ApiError;
use crate::http::ApiClient;

/// A plan as the backend advertises it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
}

/// `/subscription-plan` and `/subscription` endpoints.
pub struct SubscriptionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SubscriptionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Available plans. Both list-response shapes are accepted.
    pub async fn plans(&self) -> Result<Vec<SubscriptionPlan>, ApiError> {
        let body = self.client.get_cached("/subscription-plan").await?;
        Ok(Page::from_body(body)?.items)
    }

    pub async fn subscribe(&self, plan_id: &str) -> Result<Subscription, ApiError> {
        let body = self
            .client
            .post("/subscription", serde_json::json!({ "planId": plan_id }))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn change_plan(&self, id: &str, plan_id: &str) -> Result<Subscription, ApiError> {
        let body = self
            .client
            .patch(
                &format!("/subscription/{id}"),
                serde_json::json!({ "planId": plan_id }),
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn cancel(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/subscription/{id}")).await?;
        Ok(())
    }
}
