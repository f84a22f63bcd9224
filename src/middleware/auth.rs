use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::cache::CachedSession;
use crate::error::AppError;
use crate::models::Permission;

/// 浏览器客户端携带会话 token 的 cookie
pub const SESSION_COOKIE: &str = "session-token";

/// 当前请求解析出的会话（可能没有）。经过 [`session_middleware`] 后总会作为请求扩展存在
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<CachedSession>);

impl CurrentSession {
    pub fn require(&self) -> Result<&CachedSession, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }

    pub fn require_permission(&self, permission: Permission) -> Result<&CachedSession, AppError> {
        let session = self.require()?;
        if session.has_permission(permission) {
            Ok(session)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// 从 `Authorization: Bearer <token>` 请求头读取 token，忽略其他认证方式
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

/// 会话中间件：先读 bearer 请求头，再读 cookie，解析结果作为 [`CurrentSession`] 扩展
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .map(str::to_string)
        .or_else(|| {
            jar.get(SESSION_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|token| !token.is_empty())
        });

    let session = match token {
        Some(token) => state.sessions.resolve(&token).await?,
        None => None,
    };

    request.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(request).await)
}
