use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    middleware::{log_errors, session_middleware},
    routes,
};

/// 所有路由都经过会话中间件，是否需要会话或权限由处理函数决定
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/session", get(routes::session::current))
        .route("/session/anonymous", post(routes::session::create_anonymous))
        .route(
            "/session/active-order",
            put(routes::session::set_active_order)
                .delete(routes::session::unset_active_order),
        )
        .route("/session/logout", post(routes::session::logout))
        .route("/users/{user_id}/sessions", delete(routes::user::delete_sessions))
        .route("/roles/changed", post(routes::role::roles_changed))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
