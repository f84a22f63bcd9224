pub mod permission;
pub mod user;

pub use permission::Permission;
pub use user::{Role, User};
