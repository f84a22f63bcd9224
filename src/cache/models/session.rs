use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Permission;

/// 缓存会话中的已认证用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSessionUser {
    pub id: i64,
    pub identifier: String,
    pub verified: bool,
    pub permissions: BTreeSet<Permission>,
}

/// 会话及其权限数据的不可变快照
///
/// `cache_expiry`（unix 秒）决定快照在不回源的情况下可以使用多久，与 `expires_at` 无关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub cache_expiry: i64,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CachedSessionUser>,
}

impl CachedSession {
    pub fn is_stale_at(&self, now_seconds: i64) -> bool {
        self.cache_expiry < now_seconds
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.permissions.contains(&permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(cache_expiry: i64, expires_at: DateTime<Utc>) -> CachedSession {
        CachedSession {
            token: "t".into(),
            expires_at,
            cache_expiry,
            is_anonymous: true,
            authentication_strategy: None,
            active_order_id: None,
            user: None,
        }
    }

    #[test]
    fn staleness_and_expiry_are_independent() {
        let now = Utc::now();
        let s = session(now.timestamp() - 1, now + Duration::hours(1));
        assert!(s.is_stale_at(now.timestamp()));
        assert!(!s.is_expired_at(now));

        let s = session(now.timestamp() + 60, now - Duration::seconds(1));
        assert!(!s.is_stale_at(now.timestamp()));
        assert!(s.is_expired_at(now));

        let s = session(now.timestamp() + 60, now);
        assert!(s.is_expired_at(now));
    }

    #[test]
    fn anonymous_has_no_permissions() {
        let s = session(0, Utc::now());
        assert!(!s.has_permission(Permission::Public));
        assert_eq!(s.user_id(), None);
    }
}
