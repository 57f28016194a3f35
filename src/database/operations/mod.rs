// 各实体的数据库查询操作

pub mod banner;
pub mod category;
pub mod goods;
pub mod hot_search;
