use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::UserRepository;
use crate::error::StoreError;
use crate::models::{Permission, Role, User};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    identifier: String,
    verified: bool,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    code: String,
    description: String,
    permissions: Vec<String>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        let permissions = row
            .permissions
            .iter()
            .filter_map(|name| match name.parse::<Permission>() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    tracing::warn!(role = %row.code, "skipping {}", e);
                    None
                }
            })
            .collect();

        Role {
            id: row.id,
            code: row.code,
            description: row.description,
            permissions,
        }
    }
}

/// 从 Postgres 加载用户及其角色
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_user_with_roles_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let Some(user) = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, identifier, verified
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.code, r.description, r.permissions
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(User {
            id: user.id,
            identifier: user.identifier,
            verified: user.verified,
            roles: roles.into_iter().map(Role::from).collect(),
        }))
    }
}
