/// 会话缓存键前缀
pub const SESSION_PREFIX: &str = "session:";

/// 匹配所有会话键
pub fn session_key_pattern() -> String {
    format!("{}*", SESSION_PREFIX)
}

pub fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_PREFIX, token)
}
