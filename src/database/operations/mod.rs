// 数据库操作实现

// 会话存储
pub mod session;

// 用户及角色查询
pub mod user;
