mod auth;
mod error_handler;

pub use auth::{CurrentSession, SESSION_COOKIE, session_middleware};
pub use error_handler::log_errors;
