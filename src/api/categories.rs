//! Spending categories, images, and diary endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ListQuery, Page, fetch_one, fetch_page};
use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `/categories`, `/image`, and `/diary` endpoints.
pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Category>, ApiError> {
        fetch_page(self.client, "/categories", query).await
    }

    pub async fn get(&self, id: &str) -> Result<Category, ApiError> {
        fetch_one(self.client, &format!("/categories/{id}")).await
    }

    pub async fn create(&self, category: &CategoryUpdate) -> Result<Category, ApiError> {
        let body = self
            .client
            .post("/categories", serde_json::to_value(category)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn update(&self, id: &str, category: &CategoryUpdate) -> Result<Category, ApiError> {
        let body = self
            .client
            .patch(&format!("/categories/{id}"), serde_json::to_value(category)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/categories/{id}")).await?;
        Ok(())
    }

    pub async fn images(&self, query: &ListQuery) -> Result<Page<ImageRecord>, ApiError> {
        fetch_page(self.client, "/image", query).await
    }

    pub async fn delete_image(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/image/{id}")).await?;
        Ok(())
    }

    pub async fn diary(&self, query: &ListQuery) -> Result<Page<DiaryEntry>, ApiError> {
        fetch_page(self.client, "/diary", query).await
    }

    pub async fn add_diary_entry(&self, text: &str) -> Result<DiaryEntry, ApiError> {
        let body = self
            .client
            .post("/diary", serde_json::json!({ "text": text }))
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}
