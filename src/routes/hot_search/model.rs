use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::cache::keys;
use crate::cache::operations::{try_get_cached, try_set_cached};
use crate::database::models::hot_search::HotSearchWordEntity;
use crate::database::operations::hot_search::HotSearchOperation;

const HOT_SEARCH_CACHE_EXPIRE: u64 = 600;

/// 热门搜索词信息
#[derive(Debug, Serialize, Deserialize)]
pub struct HotSearchWordInfo {
    pub id: i32,
    pub keywords: String,
    pub index: i32,
    pub add_time: DateTime<Utc>,
}

impl From<HotSearchWordEntity> for HotSearchWordInfo {
    fn from(entity: HotSearchWordEntity) -> Self {
        Self {
            id: entity.id,
            keywords: entity.keywords,
            index: entity.index,
            add_time: entity.add_time,
        }
    }
}

impl HotSearchWordInfo {
    /// 全部热搜词，按展示顺序升序
    pub async fn list(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
    ) -> Result<Vec<HotSearchWordInfo>, sqlx::Error> {
        let cache_key = keys::hot_search_list_key();
        if let Some(cached) = try_get_cached::<Vec<HotSearchWordInfo>>(redis, &cache_key).await {
            return Ok(cached);
        }

        let words = HotSearchOperation::new(pool.clone()).list_ordered().await?;
        let words: Vec<HotSearchWordInfo> = words.into_iter().map(HotSearchWordInfo::from).collect();

        try_set_cached(redis, &cache_key, &words, HOT_SEARCH_CACHE_EXPIRE).await;

        Ok(words)
    }
}
