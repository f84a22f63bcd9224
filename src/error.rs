use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::result::ApiResult;
use crate::utils::error_codes;

/// 持久化存储错误（会话、用户、角色）
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 相同键的记录已存在
    #[error("conflict: {0}")]
    Conflict(String),

    /// 存储不可用或查询失败
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return StoreError::Conflict(db_err.message().to_string());
        }
        StoreError::Unavailable(e.to_string())
    }
}

/// 会话缓存错误
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// 会话服务错误
///
/// token 不存在、已失效或已过期都不算错误，`resolve` 返回 `Ok(None)`
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("could not allocate a unique session token after {attempts} attempts")]
    TokenGeneration { attempts: u32 },
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        tracing::error!(error = %e, "session operation failed");
        AppError::InternalServerError
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "no active session",
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                error_codes::PERMISSION_DENIED,
                "permission denied",
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND, "not found"),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "internal server error",
            ),
        };

        (status, Json(ApiResult::<()>::error(code, message))).into_response()
    }
}
