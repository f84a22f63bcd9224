use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// 角色，一组权限
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub code: String,
    pub description: String,
    pub permissions: HashSet<Permission>,
}

impl Role {
    pub fn new(id: i64, code: impl Into<String>, permissions: impl IntoIterator<Item = Permission>) -> Self {
        let code = code.into();
        Self {
            id,
            description: code.clone(),
            code,
            permissions: permissions.into_iter().collect(),
        }
    }
}

/// 用户及其角色
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub identifier: String,
    pub verified: bool,
    pub roles: Vec<Role>,
}
