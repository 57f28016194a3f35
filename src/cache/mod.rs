// 缓存模块
// 目录接口的响应缓存：键的拼装规则与通用的读写操作

pub mod keys;
pub mod operations;

pub use operations::CacheOperations;
