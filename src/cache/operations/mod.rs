// 会话缓存策略

// 进程内缓存
pub mod memory;

// 不缓存
pub mod noop;

// Redis 缓存
pub mod session;

pub use memory::InMemorySessionCache;
pub use noop::NoopSessionCache;
pub use session::RedisSessionCache;
