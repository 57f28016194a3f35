// 轮播图实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 首页轮播图实体
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BannerEntity {
    /// 记录ID
    pub id: i32,
    /// 轮播指向的商品ID
    pub goods_id: i32,
    /// 轮播图片地址
    pub image: String,
    /// 轮播顺序，小的在前
    pub index: i32,
    /// 添加时间
    pub add_time: DateTime<Utc>,
}
