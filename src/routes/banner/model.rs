use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::cache::keys;
use crate::cache::operations::{try_get_cached, try_set_cached};
use crate::database::models::banner::BannerEntity;
use crate::database::operations::banner::BannerOperation;

const BANNER_CACHE_EXPIRE: u64 = 600;

/// 首页轮播图信息
#[derive(Debug, Serialize, Deserialize)]
pub struct BannerInfo {
    pub id: i32,
    pub goods_id: i32,
    pub image: String,
    pub index: i32,
    pub add_time: DateTime<Utc>,
}

impl From<BannerEntity> for BannerInfo {
    fn from(entity: BannerEntity) -> Self {
        Self {
            id: entity.id,
            goods_id: entity.goods_id,
            image: entity.image,
            index: entity.index,
            add_time: entity.add_time,
        }
    }
}

impl BannerInfo {
    /// 全部轮播图，按轮播顺序升序
    pub async fn list(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
    ) -> Result<Vec<BannerInfo>, sqlx::Error> {
        let cache_key = keys::banner_list_key();
        if let Some(cached) = try_get_cached::<Vec<BannerInfo>>(redis, &cache_key).await {
            return Ok(cached);
        }

        let banners = BannerOperation::new(pool.clone()).list_ordered().await?;
        let banners: Vec<BannerInfo> = banners.into_iter().map(BannerInfo::from).collect();

        try_set_cached(redis, &cache_key, &banners, BANNER_CACHE_EXPIRE).await;

        Ok(banners)
    }
}
