use async_trait::async_trait;

use crate::cache::SessionCache;
use crate::cache::models::session::CachedSession;
use crate::error::CacheError;

/// 不缓存，每次解析都查存储
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSessionCache;

#[async_trait]
impl SessionCache for NoopSessionCache {
    async fn get(&self, _token: &str) -> Result<Option<CachedSession>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _session: &CachedSession) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _token: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
