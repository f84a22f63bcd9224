use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::{session_key, session_key_pattern};
use crate::cache::models::session::CachedSession;
use crate::cache::SessionCache;
use crate::error::CacheError;
use crate::utils::now_seconds;

/// 会话缓存操作
///
/// 多个服务实例共享的 Redis 会话缓存。条目以 JSON 存在 `session:{token}` 下，
/// TTL 截止到 `cache_expiry`，陈旧的快照会自动过期
#[derive(Clone)]
pub struct RedisSessionCache {
    redis: Arc<RedisClient>,
}

impl RedisSessionCache {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, token: &str) -> Result<Option<CachedSession>, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(session_key(token)).await?;

        match result {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, session: &CachedSession) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(session)?;
        let ttl = (session.cache_expiry - now_seconds()).max(1) as u64;

        let _: () = conn.set_ex(session_key(&session.token), json, ttl).await?;

        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(session_key(token)).await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let keys: Vec<String> = conn.keys(session_key_pattern()).await?;
        if !keys.is_empty() {
            let _: () = conn.del(keys).await?;
        }

        Ok(())
    }
}
