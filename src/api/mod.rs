//! Typed surface over the admin REST API.
//!
//! One module per resource; each is a borrowed, zero-state handle on the
//! [`ApiClient`]. List endpoints share [`ListQuery`] and normalize the two
//! response shapes the backend emits (bare array, or `{ data, meta }`) into
//! a [`Page`].

pub mod auth;
pub mod cards;
pub mod categories;
pub mod subscriptions;
pub mod transactions;
pub mod users;
pub mod wallets;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::ApiClient;

pub use auth::AuthApi;
pub use cards::CardsApi;
pub use categories::CategoriesApi;
pub use subscriptions::SubscriptionsApi;
pub use transactions::TransactionsApi;
pub use users::UsersApi;
pub use wallets::WalletsApi;

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Pagination/sorting parameters accepted by every list endpoint.
///
/// Serialized with the backend's camelCase parameter names
/// (`page`, `limit`, `sortBy`, `sortOrder`).
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    /// Append the query string to `path`. A default query leaves the path
    /// untouched so cache keys stay stable.
    pub fn apply(&self, path: &str) -> String {
        let mut pairs = url::form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        if let Some(page) = self.page {
            pairs.append_pair("page", &page.to_string());
            any = true;
        }
        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
            any = true;
        }
        if let Some(ref sort_by) = self.sort_by {
            pairs.append_pair("sortBy", sort_by);
            any = true;
        }
        if let Some(sort_order) = self.sort_order {
            pairs.append_pair("sortOrder", sort_order.as_str());
            any = true;
        }
        if any {
            format!("{path}?{}", pairs.finish())
        } else {
            path.to_string()
        }
    }
}

/// Pagination metadata from wrapped list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default)]
        meta: Option<PageMeta>,
    },
    Bare(Vec<T>),
}

/// One page of a server-owned collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Normalize either list-response shape into a page.
    pub fn from_body(body: serde_json::Value) -> Result<Self, ApiError> {
        let response: ListResponse<T> = serde_json::from_value(body)?;
        Ok(match response {
            ListResponse::Wrapped { data, meta } => Self { items: data, meta },
            ListResponse::Bare(items) => Self { items, meta: None },
        })
    }
}

/// Shared list-fetch path: cached GET, both response shapes accepted, and
/// 5xx degraded to an empty page (no retry — a failing backend should not
/// be hammered, and list screens render fine empty).
pub(crate) async fn fetch_page<T: DeserializeOwned>(
    client: &ApiClient,
    path: &str,
    query: &ListQuery,
) -> Result<Page<T>, ApiError> {
    let full = query.apply(path);
    match client.get_cached(&full).await {
        Ok(body) => Page::from_body(body),
        Err(e) if e.is_server_error() => {
            tracing::warn!(path = %full, error = %e, "List fetch failed; returning empty page");
            Ok(Page::empty())
        }
        Err(e) => Err(e),
    }
}

/// Fetch and decode a single entity.
pub(crate) async fn fetch_one<T: DeserializeOwned>(
    client: &ApiClient,
    path: &str,
) -> Result<T, ApiError> {
    let body = client.get_cached(path).await?;
    Ok(serde_json::from_value(body)?)
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn wallets(&self) -> WalletsApi<'_> {
        WalletsApi::new(self)
    }

    pub fn transactions(&self) -> TransactionsApi<'_> {
        TransactionsApi::new(self)
    }

    pub fn cards(&self) -> CardsApi<'_> {
        CardsApi::new(self)
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    pub fn subscriptions(&self) -> SubscriptionsApi<'_> {
        SubscriptionsApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_serializes_camel_case_names() {
        let q = ListQuery::default()
            .page(2)
            .limit(50)
            .sort("createdAt", SortOrder::Desc);
        assert_eq!(
            q.apply("/wallet"),
            "/wallet?page=2&limit=50&sortBy=createdAt&sortOrder=desc"
        );
    }

    #[test]
    fn empty_query_leaves_path_alone() {
        assert_eq!(ListQuery::default().apply("/wallet"), "/wallet");
    }

    #[test]
    fn page_normalizes_bare_array() {
        let page: Page<serde_json::Value> =
            Page::from_body(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.meta.is_none());
    }

    #[test]
    fn page_normalizes_wrapped_shape() {
        let page: Page<serde_json::Value> = Page::from_body(json!({
            "data": [{"id": "a"}],
            "meta": {"page": 1, "limit": 20, "total": 41, "totalPages": 3}
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        let meta = page.meta.unwrap();
        assert_eq!(meta.total, Some(41));
        assert_eq!(meta.total_pages, Some(3));
    }

    #[test]
    fn page_rejects_non_list_bodies() {
        let result: Result<Page<serde_json::Value>, _> = Page::from_body(json!({"id": "a"}));
        assert!(result.is_err());
    }
}
