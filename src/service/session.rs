//! 会话生命周期：创建、token 解析和失效
//!
//! 持久化存储是唯一的数据源。解析出的会话在 `cache_expiry` 之前从缓存读取，
//! 之后从存储重建并重新计算权限

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::{CachedSession, CachedSessionUser, SessionCache};
use crate::config::SessionOptions;
use crate::database::{SessionRecord, SessionStore, UserRepository};
use crate::error::{SessionError, SessionResult, StoreError};
use crate::models::User;
use crate::service::permission::PermissionResolver;
use crate::utils::{expiry_from_now, generate_session_token, token_prefix};

/// 生成 token 并写入的最大尝试次数
const MAX_TOKEN_ATTEMPTS: u32 = 3;

pub struct SessionService {
    store: Arc<dyn SessionStore>,
    cache: Arc<dyn SessionCache>,
    users: Arc<dyn UserRepository>,
    options: SessionOptions,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        cache: Arc<dyn SessionCache>,
        users: Arc<dyn UserRepository>,
        options: SessionOptions,
    ) -> Self {
        Self {
            store,
            cache,
            users,
            options,
        }
    }

    /// 为刚通过 `strategy` 认证的用户创建会话并写入缓存
    pub async fn create_authenticated_session(
        &self,
        user: &User,
        strategy: &str,
    ) -> SessionResult<CachedSession> {
        let expires_at = expiry_from_now(self.options.session_duration);
        let record = self
            .insert_new_record(|token| {
                SessionRecord::authenticated(token, user.id, strategy, expires_at)
            })
            .await?;

        let session = self.serialize(&record, Some(user));
        self.install(&session).await;

        info!(
            user_id = user.id,
            strategy,
            token = token_prefix(&session.token),
            "created authenticated session"
        );
        Ok(session)
    }

    pub async fn create_anonymous_session(&self) -> SessionResult<CachedSession> {
        let expires_at = expiry_from_now(self.options.anonymous_session_duration);
        let record = self
            .insert_new_record(|token| SessionRecord::anonymous(token, expires_at))
            .await?;

        let session = self.serialize(&record, None);
        self.install(&session).await;

        debug!(token = token_prefix(&session.token), "created anonymous session");
        Ok(session)
    }

    /// 把请求携带的 token 解析为可用的会话
    ///
    /// token 不存在、已失效或已过期都返回 `Ok(None)`，存储故障返回错误
    pub async fn resolve(&self, token: &str) -> SessionResult<Option<CachedSession>> {
        self.resolve_at(token, Utc::now()).await
    }

    /// 同 [`resolve`](Self::resolve)，以 `now` 为当前时间判断过期和新鲜度
    pub async fn resolve_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> SessionResult<Option<CachedSession>> {
        let cached = match self.cache.get(token).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "session cache read failed, falling back to store");
                None
            }
        };

        if let Some(session) = cached {
            let stale = session.is_stale_at(now.timestamp());
            let expired = session.is_expired_at(now);
            if !stale && !expired {
                return Ok(Some(session));
            }
            debug!(
                token = token_prefix(token),
                stale, expired, "cached session needs reload"
            );
        }

        self.load_and_install(token, now).await
    }

    /// 用户在所有设备上登出
    ///
    /// 返回时该用户所有会话的缓存都已删除，返回失效的会话数
    pub async fn delete_sessions_for_user(&self, user_id: i64) -> SessionResult<u64> {
        let tokens = self.store.find_tokens_for_user(user_id).await?;
        self.evict_all(&tokens).await?;

        let invalidated = self.store.invalidate_all_for_user(user_id).await?;

        // 失效之前读过存储的并发解析可能已把这些 token 重新写入缓存
        self.evict_all(&tokens).await?;

        info!(user_id, invalidated, "invalidated all sessions for user");
        Ok(invalidated)
    }

    /// 登出单个会话
    pub async fn invalidate_session(&self, token: &str) -> SessionResult<()> {
        self.cache.delete(token).await?;
        self.store.invalidate(token).await?;
        self.cache.delete(token).await?;

        info!(token = token_prefix(token), "invalidated session");
        Ok(())
    }

    /// 为会话绑定进行中的订单并刷新缓存，token 没有有效会话时返回 `Ok(None)`
    pub async fn set_active_order(
        &self,
        token: &str,
        order_id: i64,
    ) -> SessionResult<Option<CachedSession>> {
        self.update_active_order(token, Some(order_id)).await
    }

    pub async fn unset_active_order(&self, token: &str) -> SessionResult<Option<CachedSession>> {
        self.update_active_order(token, None).await
    }

    /// 清空所有缓存会话。角色或权限变更后必须调用，缓存的权限集无法按角色单独失效
    pub async fn invalidate_all_cached(&self) -> SessionResult<()> {
        self.cache.clear().await?;
        info!("cleared session cache after role change");
        Ok(())
    }

    async fn update_active_order(
        &self,
        token: &str,
        order_id: Option<i64>,
    ) -> SessionResult<Option<CachedSession>> {
        if !self.store.update_active_order(token, order_id).await? {
            self.cache.delete(token).await?;
            return Ok(None);
        }
        self.load_and_install(token, Utc::now()).await
    }

    /// 从存储重建 `token` 的会话并写入缓存
    async fn load_and_install(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> SessionResult<Option<CachedSession>> {
        let Some(mut record) = self.store.find_active_by_token(token).await? else {
            debug!(token = token_prefix(token), "no live session for token");
            self.forget(token).await;
            return Ok(None);
        };

        if record.is_expired_at(now) {
            debug!(token = token_prefix(token), "session expired");
            self.forget(token).await;
            return Ok(None);
        }

        self.extend_expiry(&mut record, now).await;

        let user = match record.user_id {
            Some(user_id) => match self.users.find_user_with_roles_by_id(user_id).await? {
                Some(user) => Some(user),
                None => {
                    info!(user_id, "session user no longer exists");
                    self.forget(token).await;
                    return Ok(None);
                }
            },
            None => None,
        };

        let session = self.serialize(&record, user.as_ref());
        self.install(&session).await;
        Ok(Some(session))
    }

    /// 剩余时间不超过会话时长的一半时延长过期时间，
    /// 活跃会话大约每半个时长才写一次存储
    async fn extend_expiry(&self, record: &mut SessionRecord, now: DateTime<Utc>) {
        let duration = if record.is_anonymous {
            self.options.anonymous_session_duration
        } else {
            self.options.session_duration
        };

        if record.expires_at - now > duration / 2 {
            return;
        }

        let new_expiry = now + duration;
        match self.store.update_expiry(&record.token, new_expiry).await {
            Ok(()) => {
                record.expires_at = record.expires_at.max(new_expiry);
                debug!(token = token_prefix(&record.token), %new_expiry, "extended session expiry");
            }
            // 下一个满足条件的请求会重试
            Err(e) => warn!(error = %e, "failed to extend session expiry"),
        }
    }

    async fn insert_new_record<F>(&self, build: F) -> SessionResult<SessionRecord>
    where
        F: Fn(String) -> SessionRecord,
    {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let record = build(generate_session_token(self.options.token_bytes));
            match self.store.insert(&record).await {
                Ok(()) => return Ok(record),
                Err(StoreError::Conflict(_)) => {
                    warn!(attempt, "session token collision, generating a new token");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(SessionError::TokenGeneration {
            attempts: MAX_TOKEN_ATTEMPTS,
        })
    }

    fn serialize(&self, record: &SessionRecord, user: Option<&User>) -> CachedSession {
        let user = user
            .filter(|_| !record.is_anonymous)
            .map(|user| CachedSessionUser {
                id: user.id,
                identifier: user.identifier.clone(),
                verified: user.verified,
                permissions: PermissionResolver::resolve(user),
            });

        CachedSession {
            token: record.token.clone(),
            expires_at: record.expires_at,
            cache_expiry: Utc::now().timestamp() + self.options.session_cache_ttl_secs,
            is_anonymous: record.is_anonymous,
            authentication_strategy: user
                .as_ref()
                .and(record.authentication_strategy.clone()),
            active_order_id: record.active_order_id,
            user,
        }
    }

    async fn install(&self, session: &CachedSession) {
        if let Err(e) = self.cache.set(session).await {
            warn!(
                error = %e,
                token = token_prefix(&session.token),
                "failed to cache session"
            );
        }
    }

    async fn forget(&self, token: &str) {
        if let Err(e) = self.cache.delete(token).await {
            warn!(error = %e, token = token_prefix(token), "failed to evict session");
        }
    }

    async fn evict_all(&self, tokens: &[String]) -> SessionResult<()> {
        for token in tokens {
            self.cache.delete(token).await?;
        }
        Ok(())
    }
}
