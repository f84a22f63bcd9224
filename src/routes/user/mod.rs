mod handler;
mod model;

pub use handler::delete_sessions;
pub use model::InvalidatedSessionsResponse;
