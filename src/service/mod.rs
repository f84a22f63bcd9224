// 业务逻辑层

pub mod permission;
pub mod session;

// 重新导出常用类型
pub use permission::PermissionResolver;
pub use session::SessionService;
