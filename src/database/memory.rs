//! 内存存储实现，用于无 Postgres 的本地运行和测试

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{SessionRecord, SessionStore, UserRepository};
use crate::error::StoreError;
use crate::models::{Permission, User};

#[derive(Default)]
pub struct MemorySessionStore {
    records: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接读取记录，包括已失效的
    pub async fn record(&self, token: &str) -> Option<SessionRecord> {
        self.records.read().await.get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.token) {
            return Err(StoreError::Conflict("session token already exists".into()));
        }
        records.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_active_by_token(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(token)
            .filter(|r| !r.invalidated)
            .cloned())
    }

    async fn update_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(record) = self
            .records
            .write()
            .await
            .get_mut(token)
            .filter(|r| !r.invalidated)
        {
            record.expires_at = record.expires_at.max(expires_at);
        }
        Ok(())
    }

    async fn invalidate_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let mut changed = 0;
        for record in self.records.write().await.values_mut() {
            if record.user_id == Some(user_id) && !record.invalidated {
                record.invalidated = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn find_tokens_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.user_id == Some(user_id) && !r.invalidated)
            .map(|r| r.token.clone())
            .collect())
    }

    async fn update_active_order(
        &self,
        token: &str,
        order_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        match self
            .records
            .write()
            .await
            .get_mut(token)
            .filter(|r| !r.invalidated)
        {
            Some(record) => {
                record.active_order_id = order_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn invalidate(&self, token: &str) -> Result<(), StoreError> {
        if let Some(record) = self.records.write().await.get_mut(token) {
            record.invalidated = true;
        }
        Ok(())
    }
}

/// 以 id 为键的用户表，可直接修改角色数据来模拟权限变更
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn remove(&self, user_id: i64) {
        self.users.write().await.remove(&user_id);
    }

    /// 替换所有持有该角色的用户上 `role_id` 的权限
    pub async fn set_role_permissions(
        &self,
        role_id: i64,
        permissions: impl IntoIterator<Item = Permission>,
    ) {
        let permissions: std::collections::HashSet<Permission> =
            permissions.into_iter().collect();
        for user in self.users.write().await.values_mut() {
            for role in user.roles.iter_mut().filter(|r| r.id == role_id) {
                role.permissions = permissions.clone();
            }
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_user_with_roles_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
