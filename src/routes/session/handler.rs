use axum::{
    Extension,
    extract::{Json, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::AppState;
use crate::error::AppError;
use crate::middleware::{CurrentSession, SESSION_COOKIE};
use crate::utils::success_to_api_response;

use super::model::{SessionResponse, SetActiveOrderRequest};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .build()
}

#[axum::debug_handler]
pub async fn create_anonymous(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.create_anonymous_session().await?;
    let jar = jar.add(session_cookie(session.token.clone()));

    Ok((jar, success_to_api_response(SessionResponse::from(session))))
}

#[axum::debug_handler]
pub async fn current(
    Extension(current): Extension<CurrentSession>,
) -> Result<impl IntoResponse, AppError> {
    let session = current.require()?.clone();
    Ok(success_to_api_response(SessionResponse::from(session)))
}

#[axum::debug_handler]
pub async fn set_active_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Json(req): Json<SetActiveOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = current.require()?.token.clone();
    let session = state
        .sessions
        .set_active_order(&token, req.order_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(success_to_api_response(SessionResponse::from(session)))
}

#[axum::debug_handler]
pub async fn unset_active_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<impl IntoResponse, AppError> {
    let token = current.require()?.token.clone();
    let session = state
        .sessions
        .unset_active_order(&token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(success_to_api_response(SessionResponse::from(session)))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = current.require()?.token.clone();
    state.sessions.invalidate_session(&token).await?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, success_to_api_response(())))
}
