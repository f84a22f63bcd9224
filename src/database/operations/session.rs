use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::SessionStore;
use crate::database::models::SessionRecord;
use crate::error::StoreError;
use crate::utils::token_prefix;

/// 基于 `sessions` 表的 Postgres 会话存储
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions
                (token, user_id, authentication_strategy, expires_at, invalidated, is_anonymous, active_order_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(&record.authentication_strategy)
        .bind(record.expires_at)
        .bind(record.invalidated)
        .bind(record.is_anonymous)
        .bind(record.active_order_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = StoreError::from(e);
            if let StoreError::Conflict(_) = err {
                tracing::warn!(token = token_prefix(&record.token), "session token collision");
            }
            err
        })?;

        Ok(())
    }

    async fn find_active_by_token(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT token, user_id, authentication_strategy, expires_at, invalidated, is_anonymous, active_order_id
            FROM sessions
            WHERE token = $1 AND invalidated = false
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET expires_at = GREATEST(expires_at, $2)
            WHERE token = $1 AND invalidated = false
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn invalidate_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET invalidated = true
            WHERE user_id = $1 AND invalidated = false
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_tokens_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let tokens: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT token FROM sessions
            WHERE user_id = $1 AND invalidated = false
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens)
    }

    async fn update_active_order(
        &self,
        token: &str,
        order_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET active_order_id = $2
            WHERE token = $1 AND invalidated = false
            "#,
        )
        .bind(token)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn invalidate(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE sessions SET invalidated = true WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
