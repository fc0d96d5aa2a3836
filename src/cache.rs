//! Short-TTL response cache for GET fetches.
//!
//! Keyed by path+query. Entries live for a couple of minutes at most; the
//! cache exists to absorb rapid screen revisits, not to be a store of
//! record. Mutations invalidate by path prefix so a `POST /wallet` drops
//! every cached wallet list and detail.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

struct Entry {
    stored_at: Instant,
    body: serde_json::Value,
}

/// In-memory TTL cache over raw JSON response bodies.
#[derive(Clone)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a fresh entry. Expired entries are dropped on the way out.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    return Some(entry.body.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: take the write lock and evict.
        self.entries.write().await.remove(key);
        None
    }

    pub async fn insert(&self, key: impl Into<String>, body: serde_json::Value) {
        let entry = Entry {
            stored_at: Instant::now(),
            body,
        };
        self.entries.write().await.insert(key.into(), entry);
    }

    /// Drop every entry whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.entries
            .write()
            .await
            .retain(|key, _| !key.starts_with(prefix));
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn hit_within_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("/wallet?page=1", json!([{"id": "w1"}])).await;
        assert_eq!(
            cache.get("/wallet?page=1").await,
            Some(json!([{"id": "w1"}]))
        );
        assert_eq!(cache.get("/wallet?page=2").await, None);
    }

    #[tokio::test]
    async fn expired_entries_miss_and_are_evicted() {
        let cache = ResponseCache::new(Duration::from_millis(0));
        cache.insert("/card", json!([])).await;
        assert_eq!(cache.get("/card").await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn prefix_invalidation_is_scoped() {
        let cache = ResponseCache::default();
        cache.insert("/wallet?page=1", json!(1)).await;
        cache.insert("/wallet/w1", json!(2)).await;
        cache.insert("/transactions?page=1", json!(3)).await;

        cache.invalidate_prefix("/wallet").await;
        assert_eq!(cache.get("/wallet?page=1").await, None);
        assert_eq!(cache.get("/wallet/w1").await, None);
        assert_eq!(cache.get("/transactions?page=1").await, Some(json!(3)));
    }
}
