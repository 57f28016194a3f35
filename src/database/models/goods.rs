// 商品实体
// 定义商品相关的数据库实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 商品实体，对应数据库中的商品表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoodsEntity {
    /// 商品ID
    pub id: i32,
    /// 所属类目ID
    pub category_id: i32,
    /// 商品唯一货号
    pub goods_sn: String,
    /// 商品名称
    pub name: String,
    /// 点击数
    pub click_num: i32,
    /// 销售量
    pub sold_num: i32,
    /// 收藏数
    pub fav_num: i32,
    /// 库存数
    pub goods_num: i32,
    /// 市场价格
    pub market_price: f64,
    /// 本店价格
    pub shop_price: f64,
    /// 商品简短描述
    pub goods_brief: String,
    /// 商品详情
    pub goods_desc: String,
    /// 是否免运费
    pub ship_free: bool,
    /// 封面图
    pub goods_front_image: Option<String>,
    /// 是否新品
    pub is_new: bool,
    /// 是否热销
    pub is_hot: bool,
    /// 上架时间
    pub add_time: DateTime<Utc>,
}

/// 商品轮播图实体，对应数据库中的商品图片表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoodsImageEntity {
    /// 记录ID
    pub id: i32,
    /// 商品ID
    pub goods_id: i32,
    /// 图片地址
    pub image: String,
    /// 添加时间
    pub add_time: DateTime<Utc>,
}
