use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidatedSessionsResponse {
    pub user_id: i64,
    pub invalidated: u64,
}
