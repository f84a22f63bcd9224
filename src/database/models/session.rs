use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// 会话持久化记录，以 token 为键
///
/// 匿名会话不携带用户 id 和认证方式
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: Option<i64>,
    pub authentication_strategy: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub invalidated: bool,
    pub is_anonymous: bool,
    pub active_order_id: Option<i64>,
}

impl SessionRecord {
    pub fn authenticated(
        token: String,
        user_id: i64,
        authentication_strategy: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            user_id: Some(user_id),
            authentication_strategy: Some(authentication_strategy.to_string()),
            expires_at,
            invalidated: false,
            is_anonymous: false,
            active_order_id: None,
        }
    }

    pub fn anonymous(token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id: None,
            authentication_strategy: None,
            expires_at,
            invalidated: false,
            is_anonymous: true,
            active_order_id: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
