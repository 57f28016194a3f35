// 数据库模块
// 包含目录实体定义和各实体的查询操作

pub mod models;
pub mod operations;

// 重新导出常用类型，方便其他模块使用
pub use models::goods::{GoodsEntity, GoodsImageEntity};
pub use operations::goods::{GoodsFilter, GoodsOperation};
