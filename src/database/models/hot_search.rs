// 热搜词实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 热门搜索词实体
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HotSearchWordEntity {
    /// 记录ID
    pub id: i32,
    /// 搜索词
    pub keywords: String,
    /// 展示顺序，小的在前
    pub index: i32,
    /// 添加时间
    pub add_time: DateTime<Utc>,
}
