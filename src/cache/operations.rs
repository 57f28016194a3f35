use redis::{AsyncCommands, Client as RedisClient};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// 响应缓存操作
///
/// 所有目录接口共用的缓存读写：值以 JSON 字符串落在 Redis，
/// 读写失败由调用方降级到数据库，不向上传播
pub struct CacheOperations;

impl CacheOperations {
    /// 读取并反序列化缓存值，未命中返回 None
    pub async fn get_json<T: DeserializeOwned>(
        redis: &Arc<RedisClient>,
        key: &str,
    ) -> Result<Option<T>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// 序列化并写入缓存值，带过期时间
    pub async fn set_json<T: Serialize>(
        redis: &Arc<RedisClient>,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;

        let _: () = conn.set_ex(key, json, ttl_secs).await?;

        Ok(())
    }
}

/// 尝试读取缓存，任何失败都按未命中处理
pub async fn try_get_cached<T: DeserializeOwned>(
    redis: &Arc<RedisClient>,
    key: &str,
) -> Option<T> {
    match CacheOperations::get_json(redis, key).await {
        Ok(Some(value)) => {
            tracing::debug!("cache hit: {}", key);
            Some(value)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("cache read failed for {}: {}", key, e);
            None
        }
    }
}

/// 尝试写入缓存，失败只记录日志
pub async fn try_set_cached<T: Serialize>(
    redis: &Arc<RedisClient>,
    key: &str,
    value: &T,
    ttl_secs: u64,
) {
    if let Err(e) = CacheOperations::set_json(redis, key, value, ttl_secs).await {
        tracing::debug!("cache write failed for {}: {}", key, e);
    } else {
        tracing::debug!("cache set: {}", key);
    }
}
