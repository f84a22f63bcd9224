use std::sync::Arc;

use config::Config;
use service::SessionService;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod routes;
pub mod service;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub config: Config,
}
