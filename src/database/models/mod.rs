// 目录实体定义

pub mod banner;
pub mod category;
pub mod goods;
pub mod hot_search;
