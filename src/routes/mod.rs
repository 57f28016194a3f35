// 目录接口路由
// 每个实体一个子模块：handler 负责请求解析与响应，model 负责数据拼装与缓存

pub mod banner;
pub mod category;
pub mod goods;
pub mod hot_search;
