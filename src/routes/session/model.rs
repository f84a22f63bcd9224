use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CachedSession;
use crate::models::Permission;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub identifier: String,
    pub verified: bool,
    pub permissions: Vec<Permission>,
}

/// 对外返回的会话信息，不包含缓存相关字段
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl From<CachedSession> for SessionResponse {
    fn from(session: CachedSession) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
            is_anonymous: session.is_anonymous,
            authentication_strategy: session.authentication_strategy,
            active_order_id: session.active_order_id,
            user: session.user.map(|user| SessionUser {
                id: user.id,
                identifier: user.identifier,
                verified: user.verified,
                permissions: user.permissions.into_iter().collect(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveOrderRequest {
    pub order_id: i64,
}
