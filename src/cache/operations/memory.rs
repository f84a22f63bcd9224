use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::SessionCache;
use crate::cache::models::session::CachedSession;
use crate::error::CacheError;

/// 默认最多缓存的会话数
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// 进程内会话缓存
///
/// 最多 `capacity` 条，缓存已满时写入新 token 会先淘汰 `cache_expiry` 最早的条目
pub struct InMemorySessionCache {
    entries: DashMap<String, CachedSession>,
    capacity: usize,
}

impl InMemorySessionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_one(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().cache_expiry)
            .map(|entry| entry.key().clone());

        if let Some(token) = oldest {
            self.entries.remove(&token);
        }
    }
}

impl Default for InMemorySessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, token: &str) -> Result<Option<CachedSession>, CacheError> {
        Ok(self.entries.get(token).map(|entry| entry.value().clone()))
    }

    async fn set(&self, session: &CachedSession) -> Result<(), CacheError> {
        if !self.entries.contains_key(&session.token) && self.entries.len() >= self.capacity {
            self.evict_one();
        }
        self.entries.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), CacheError> {
        self.entries.remove(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn view(token: &str, cache_expiry: i64) -> CachedSession {
        CachedSession {
            token: token.to_string(),
            expires_at: Utc::now(),
            cache_expiry,
            is_anonymous: true,
            authentication_strategy: None,
            active_order_id: None,
            user: None,
        }
    }

    #[tokio::test]
    async fn set_replaces_whole_value() {
        let cache = InMemorySessionCache::default();
        cache.set(&view("a", 10)).await.unwrap();

        let mut updated = view("a", 20);
        updated.active_order_id = Some(42);
        cache.set(&updated).await.unwrap();

        assert_eq!(cache.get("a").await.unwrap(), Some(updated));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let cache = InMemorySessionCache::default();
        cache.set(&view("a", 10)).await.unwrap();
        cache.set(&view("b", 10)).await.unwrap();

        cache.delete("a").await.unwrap();
        assert!(cache.get("a").await.unwrap().is_none());
        assert!(cache.get("b").await.unwrap().is_some());

        cache.clear().await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn full_cache_evicts_oldest_entry() {
        let cache = InMemorySessionCache::new(2);
        cache.set(&view("old", 10)).await.unwrap();
        cache.set(&view("new", 30)).await.unwrap();
        cache.set(&view("newest", 50)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get("old").await.unwrap().is_none());
        assert!(cache.get("new").await.unwrap().is_some());
        assert!(cache.get("newest").await.unwrap().is_some());

        // 覆盖已有的键不触发淘汰
        cache.set(&view("new", 60)).await.unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get("newest").await.unwrap().is_some());
    }
}
