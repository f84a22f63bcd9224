mod handler;

pub use handler::roles_changed;
