use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::AppState;
use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::models::Permission;
use crate::utils::success_to_api_response;

use super::model::InvalidatedSessionsResponse;

/// 使用户在所有设备上登出，需要 `SuperAdmin` 权限
#[axum::debug_handler]
pub async fn delete_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    current.require_permission(Permission::SuperAdmin)?;

    let invalidated = state.sessions.delete_sessions_for_user(user_id).await?;
    Ok(success_to_api_response(InvalidatedSessionsResponse {
        user_id,
        invalidated,
    }))
}
