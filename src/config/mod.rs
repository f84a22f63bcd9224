use std::env;
use std::time::Duration;

use crate::utils::DEFAULT_TOKEN_BYTES;

const DEFAULT_SESSION_DURATION: &str = "1y";
const DEFAULT_ANONYMOUS_SESSION_DURATION: &str = "1y";
const DEFAULT_SESSION_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_SESSION_CACHE_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub session_duration: Duration,
    pub anonymous_session_duration: Duration,
    pub session_cache_ttl_secs: u64,
    pub session_cache_size: usize,
    pub session_token_bytes: usize,
}

/// 会话服务使用的配置项
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub session_duration: chrono::Duration,
    pub anonymous_session_duration: chrono::Duration,
    pub session_cache_ttl_secs: i64,
    pub token_bytes: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            session_duration: chrono::Duration::days(365),
            anonymous_session_duration: chrono::Duration::days(365),
            session_cache_ttl_secs: DEFAULT_SESSION_CACHE_TTL_SECS as i64,
            token_bytes: DEFAULT_TOKEN_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值查询构建配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let redis_url = lookup("REDIS_URL").filter(|url| !url.trim().is_empty());

        let session_duration = parse_duration(
            "SESSION_DURATION",
            lookup("SESSION_DURATION").as_deref(),
            DEFAULT_SESSION_DURATION,
        )?;
        let anonymous_session_duration = parse_duration(
            "ANONYMOUS_SESSION_DURATION",
            lookup("ANONYMOUS_SESSION_DURATION").as_deref(),
            DEFAULT_ANONYMOUS_SESSION_DURATION,
        )?;

        Ok(Config {
            database_url,
            redis_url,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: parse_number("SERVER_PORT", lookup("SERVER_PORT"), 3000)?,
            session_duration,
            anonymous_session_duration,
            session_cache_ttl_secs: parse_number(
                "SESSION_CACHE_TTL",
                lookup("SESSION_CACHE_TTL"),
                DEFAULT_SESSION_CACHE_TTL_SECS,
            )?,
            session_cache_size: parse_number(
                "SESSION_CACHE_SIZE",
                lookup("SESSION_CACHE_SIZE"),
                DEFAULT_SESSION_CACHE_SIZE,
            )?,
            session_token_bytes: parse_number(
                "SESSION_TOKEN_BYTES",
                lookup("SESSION_TOKEN_BYTES"),
                DEFAULT_TOKEN_BYTES,
            )?,
        })
    }

    pub fn session_options(&self) -> Result<SessionOptions, ConfigError> {
        Ok(SessionOptions {
            session_duration: to_chrono("SESSION_DURATION", self.session_duration)?,
            anonymous_session_duration: to_chrono(
                "ANONYMOUS_SESSION_DURATION",
                self.anonymous_session_duration,
            )?,
            session_cache_ttl_secs: i64::try_from(self.session_cache_ttl_secs).map_err(|e| {
                ConfigError::Invalid {
                    key: "SESSION_CACHE_TTL",
                    message: e.to_string(),
                }
            })?,
            token_bytes: self.session_token_bytes,
        })
    }
}

fn parse_duration(
    key: &'static str,
    value: Option<&str>,
    default: &str,
) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.unwrap_or(default).trim()).map_err(|e| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

fn parse_number<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn to_chrono(key: &'static str, duration: Duration) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::from_std(duration).map_err(|e| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.redis_url, None);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.session_cache_ttl_secs, 300);
        assert_eq!(config.session_cache_size, 1000);
        assert_eq!(config.session_token_bytes, 32);

        let options = config.session_options().unwrap();
        assert!(options.session_duration >= chrono::Duration::days(365));
        assert_eq!(options.session_cache_ttl_secs, 300);
    }

    #[test]
    fn parses_durations() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("SESSION_DURATION", "2h"),
            ("ANONYMOUS_SESSION_DURATION", "30m"),
            ("SESSION_CACHE_TTL", "60"),
        ]))
        .unwrap();
        assert_eq!(config.session_duration, Duration::from_secs(7200));
        assert_eq!(config.anonymous_session_duration, Duration::from_secs(1800));
        assert_eq!(config.session_cache_ttl_secs, 60);
    }

    #[test]
    fn missing_database_url_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_values_fail() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("SESSION_DURATION", "forever"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SESSION_DURATION",
                ..
            }
        ));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("SERVER_PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_PORT", .. }));
    }

    #[test]
    fn cache_ttl_beyond_i64_is_rejected() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("SESSION_CACHE_TTL", "18446744073709551615"),
        ]))
        .unwrap();
        let err = config.session_options().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SESSION_CACHE_TTL",
                ..
            }
        ));
    }
}
