mod handler;
mod model;

pub use handler::{create_anonymous, current, logout, set_active_order, unset_active_order};
pub use model::{SessionResponse, SessionUser, SetActiveOrderRequest};
