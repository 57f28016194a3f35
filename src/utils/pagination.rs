use serde::{Deserialize, Serialize};

/// 商品列表默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 12;
/// 每页条数上限，超出按上限截断
pub const MAX_PAGE_SIZE: u32 = 100;

/// 分页信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub page_size: u32,
    /// 总记录数
    pub total: u64,
}

/// 带分页的响应数据
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub items: Vec<T>,
    /// 分页信息
    pub pagination: Pagination,
}

/// 规范化每页条数：缺省或0退回默认值，超出上限截断
pub fn normalize_page_size(page_size: Option<u32>) -> u32 {
    match page_size {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(n) => n.min(MAX_PAGE_SIZE),
    }
}

/// 由页码换算 OFFSET，页码从1开始
pub fn page_offset(page: u32, page_size: u32) -> i64 {
    i64::from(page - 1) * i64::from(page_size)
}
