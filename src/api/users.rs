//! User endpoints, including the address/detail sub-resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ListQuery, Page, fetch_one, fetch_page};
use crate::error::ApiError;
use crate::http::ApiClient;

/// A platform user as the admin API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Mutable user fields for create/update calls.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Postal address, shared by the individual and organization variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,
}

/// NDIS plan details attached to a participant account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NdisDetails {
    pub ndis_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_manager: Option<String>,
}

/// Registration details for a service-provider account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderDetails {
    pub abn: String,
    pub organisation_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

/// Server-side onboarding progress record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

/// Node in the invitation tree (who invited whom).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationNode {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub invitees: Vec<InvitationNode>,
}

/// `/user` endpoints.
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<User>, ApiError> {
        fetch_page(self.client, "/user", query).await
    }

    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        fetch_one(self.client, &format!("/user/{id}")).await
    }

    pub async fn create(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let body = self.client.post("/user", serde_json::to_value(update)?).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<User, ApiError> {
        let body = self
            .client
            .patch(&format!("/user/{id}"), serde_json::to_value(update)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/user/{id}")).await?;
        Ok(())
    }

    pub async fn set_individual_address(&self, address: &Address) -> Result<(), ApiError> {
        self.client
            .post("/user/address/individual", serde_json::to_value(address)?)
            .await?;
        Ok(())
    }

    pub async fn set_organization_address(&self, address: &Address) -> Result<(), ApiError> {
        self.client
            .post("/user/address/organization", serde_json::to_value(address)?)
            .await?;
        Ok(())
    }

    pub async fn set_ndis_details(&self, details: &NdisDetails) -> Result<(), ApiError> {
        self.client
            .post("/user/ndis-details", serde_json::to_value(details)?)
            .await?;
        Ok(())
    }

    pub async fn set_service_provider_details(
        &self,
        details: &ServiceProviderDetails,
    ) -> Result<(), ApiError> {
        self.client
            .post("/user/service-provider-details", serde_json::to_value(details)?)
            .await?;
        Ok(())
    }

    pub async fn onboarding_status(&self) -> Result<OnboardingStatus, ApiError> {
        let body = self.client.get("/user/onboarding/status").await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Persist onboarding progress. Callers that must not block on failure
    /// wrap this in a detached task (see the onboarding coordinator).
    pub async fn update_onboarding_status(
        &self,
        status: &OnboardingStatus,
    ) -> Result<(), ApiError> {
        self.client
            .patch("/user/onboarding/status", serde_json::to_value(status)?)
            .await?;
        Ok(())
    }

    pub async fn invitations_tree(&self) -> Result<Vec<InvitationNode>, ApiError> {
        let body = self.client.get("/user/invitations/tree").await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_decodes_with_missing_optionals() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1",
            "email": "p@example.com",
        }))
        .unwrap();
        assert!(user.first_name.is_none());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = UserUpdate {
            role: Some("manager".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"role": "manager"})
        );
    }

    #[test]
    fn invitation_tree_decodes_recursively() {
        let nodes: Vec<InvitationNode> = serde_json::from_value(json!([
            {"id": "a", "email": "a@x.com", "invitees": [
                {"id": "b", "email": "b@x.com"}
            ]}
        ]))
        .unwrap();
        assert_eq!(nodes[0].invitees[0].email, "b@x.com");
    }
}
