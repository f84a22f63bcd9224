//! 数据库模块
//! 会话持久化存储，以及会话层依赖的用户/角色查询
//!
//! 会话服务只依赖 [`SessionStore`] 和 [`UserRepository`] 两个 trait，
//! Postgres 实现在 `operations`，内存实现在 `memory`

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::User;

pub mod memory;
pub mod models;
pub mod operations;

pub use memory::{MemorySessionStore, MemoryUserRepository};
pub use models::SessionRecord;
pub use operations::session::PgSessionStore;
pub use operations::user::PgUserRepository;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 写入新记录，token 已存在时返回 `StoreError::Conflict`，原记录不变
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// 查询未失效的记录，这里不检查过期时间
    async fn find_active_by_token(&self, token: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// 把过期时间推后到 `expires_at`，不会往前移
    async fn update_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// 使用户的所有会话失效，返回受影响的记录数
    async fn invalidate_all_for_user(&self, user_id: i64) -> Result<u64, StoreError>;

    /// 用户所有未失效会话的 token
    async fn find_tokens_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError>;

    /// 绑定（传 `None` 时解绑）进行中的订单，没有匹配的有效记录时返回 `false`
    async fn update_active_order(
        &self,
        token: &str,
        order_id: Option<i64>,
    ) -> Result<bool, StoreError>;

    /// 使单个会话失效
    async fn invalidate(&self, token: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 加载用户及其角色和权限，用户已不存在时返回 `Ok(None)`
    async fn find_user_with_roles_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError>;
}
