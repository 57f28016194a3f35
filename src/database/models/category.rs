// 商品类目实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 商品类目实体，三级树结构
///
/// category_type 标记层级（1为一级类目），parent_category_id 指向上一级类目
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryEntity {
    /// 类目ID
    pub id: i32,
    /// 类目名称
    pub name: String,
    /// 类目编码
    pub code: String,
    /// 类目描述
    pub description: String,
    /// 类目层级：1-一级，2-二级，3-三级
    pub category_type: i32,
    /// 上级类目ID，一级类目为空
    pub parent_category_id: Option<i32>,
    /// 是否显示为首页标签
    pub is_tab: bool,
    /// 添加时间
    pub add_time: DateTime<Utc>,
}
