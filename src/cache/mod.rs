//! 缓存模块
//! token → 不可变的 [`CachedSession`] 快照
//!
//! 缓存本身不判断新鲜度，是否陈旧或过期由会话服务在读取时检查。
//! 缓存策略可以为了限制内存提前丢弃条目，之后 `get` 返回未命中即可

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::CacheError;

pub mod keys;
pub mod models;
pub mod operations;

pub use models::{CachedSession, CachedSessionUser};
pub use operations::{InMemorySessionCache, NoopSessionCache, RedisSessionCache};

#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self, token: &str) -> Result<Option<CachedSession>, CacheError>;

    /// 以 `session.token` 为键写入，整体替换旧值
    async fn set(&self, session: &CachedSession) -> Result<(), CacheError>;

    async fn delete(&self, token: &str) -> Result<(), CacheError>;

    /// 清空所有条目，角色或权限变更时调用
    async fn clear(&self) -> Result<(), CacheError>;
}

/// 选择缓存策略：设置了 `REDIS_URL` 时用 Redis，否则用进程内缓存。
/// 没有 Redis 且 `SESSION_CACHE_SIZE=0` 时不缓存
pub fn session_cache_from_config(config: &Config) -> Result<Arc<dyn SessionCache>, CacheError> {
    if let Some(url) = &config.redis_url {
        let client = redis::Client::open(url.as_str())?;
        tracing::info!("Using Redis session cache");
        return Ok(Arc::new(RedisSessionCache::new(Arc::new(client))));
    }

    if config.session_cache_size == 0 {
        tracing::info!("Session cache disabled");
        return Ok(Arc::new(NoopSessionCache));
    }

    tracing::info!(
        capacity = config.session_cache_size,
        "Using in-memory session cache"
    );
    Ok(Arc::new(InMemorySessionCache::new(config.session_cache_size)))
}
