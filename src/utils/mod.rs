use axum::Json;
use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;

use crate::result::ApiResult;

/// 会话 token 默认的随机字节数
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// 生成会话 token：从系统安全随机数生成器取 `bytes` 个字节，十六进制编码
///
/// 这里不检查唯一性，重复的 token 由存储在写入时拒绝
pub fn generate_session_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// 可以写入日志的 token 前缀
pub fn token_prefix(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..end]
}

/// 从现在起 `duration` 后的过期时间
pub fn expiry_from_now(duration: chrono::Duration) -> DateTime<Utc> {
    Utc::now() + duration
}

/// 当前 unix 时间（秒）
pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResult<T>> {
    Json(ApiResult::success(data))
}

pub mod error_codes {
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_hex_of_requested_length() {
        let token = generate_session_token(DEFAULT_TOKEN_BYTES);
        assert_eq!(token.len(), DEFAULT_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_differ() {
        let a = generate_session_token(DEFAULT_TOKEN_BYTES);
        let b = generate_session_token(DEFAULT_TOKEN_BYTES);
        assert_ne!(a, b);
    }

    #[test]
    fn token_prefix_truncates() {
        assert_eq!(token_prefix("0123456789abcdef"), "01234567");
        assert_eq!(token_prefix("abc"), "abc");
    }
}
