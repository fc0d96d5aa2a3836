//! Payment-card endpoints.

use serde::{Deserialize, Serialize};

use crate::api::users::Address;
use crate::api::{ListQuery, Page, fetch_one, fetch_page};
use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Ordered,
    Active,
    Frozen,
    Cancelled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub status: CardStatus,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub wallet_id: Option<String>,
    #[serde(default)]
    pub last_four: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
}

/// Payload for ordering a physical card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOrder {
    pub user_id: String,
    pub wallet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
}

/// `/card` endpoints.
pub struct CardsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CardsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Card>, ApiError> {
        fetch_page(self.client, "/card", query).await
    }

    pub async fn get(&self, id: &str) -> Result<Card, ApiError> {
        fetch_one(self.client, &format!("/card/{id}")).await
    }

    pub async fn update(&self, id: &str, update: &CardUpdate) -> Result<Card, ApiError> {
        let body = self
            .client
            .patch(&format!("/card/{id}"), serde_json::to_value(update)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/card/{id}")).await?;
        Ok(())
    }

    pub async fn order(&self, order: &CardOrder) -> Result<Card, ApiError> {
        let body = self
            .client
            .post("/card/order", serde_json::to_value(order)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_payload_shape() {
        let order = CardOrder {
            user_id: "u-1".into(),
            wallet_id: "w-1".into(),
            delivery_address: None,
        };
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({"userId": "u-1", "walletId": "w-1"})
        );
    }

    #[test]
    fn card_decodes() {
        let card: Card = serde_json::from_value(json!({
            "id": "c-1",
            "status": "active",
            "lastFour": "4421",
        }))
        .unwrap();
        assert_eq!(card.status, CardStatus::Active);
        assert_eq!(card.last_four.as_deref(), Some("4421"));
    }
}
