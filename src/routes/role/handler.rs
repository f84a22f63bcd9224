use axum::{Extension, extract::State, response::IntoResponse};

use crate::AppState;
use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::models::Permission;
use crate::utils::success_to_api_response;

/// 通知角色或权限已变更，清空所有缓存会话，需要 `SuperAdmin` 权限
#[axum::debug_handler]
pub async fn roles_changed(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<impl IntoResponse, AppError> {
    current.require_permission(Permission::SuperAdmin)?;

    state.sessions.invalidate_all_cached().await?;
    Ok(success_to_api_response(()))
}
