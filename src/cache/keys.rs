/// 商品详情缓存键前缀
const GOODS_DETAIL_PREFIX: &str = "goods:detail:";

/// 商品列表缓存键前缀，后接查询条件签名
const GOODS_LIST_PREFIX: &str = "goods:list:";

/// 类目树缓存键前缀
const CATEGORY_LIST_PREFIX: &str = "category:list:";

/// 单个类目子树缓存键前缀
const CATEGORY_DETAIL_PREFIX: &str = "category:detail:";

/// 首页标签类目缓存键
const INDEX_CATEGORY_KEY: &str = "category:index";

/// 轮播图列表缓存键
const BANNER_LIST_KEY: &str = "banner:list";

/// 热搜词列表缓存键
const HOT_SEARCH_LIST_KEY: &str = "hotsearch:list";

/// 生成商品详情缓存键
pub fn goods_detail_key(goods_id: i32) -> String {
    format!("{}{}", GOODS_DETAIL_PREFIX, goods_id)
}

/// 生成商品列表缓存键，签名由查询条件规范化得到
pub fn goods_list_key(signature: &str) -> String {
    format!("{}{}", GOODS_LIST_PREFIX, signature)
}

/// 生成类目树缓存键，按排序方式区分
pub fn category_list_key(signature: &str) -> String {
    format!("{}{}", CATEGORY_LIST_PREFIX, signature)
}

/// 生成单个类目子树缓存键
pub fn category_detail_key(category_id: i32) -> String {
    format!("{}{}", CATEGORY_DETAIL_PREFIX, category_id)
}

/// 生成首页标签类目缓存键
pub fn index_category_key() -> String {
    INDEX_CATEGORY_KEY.to_string()
}

/// 生成轮播图列表缓存键
pub fn banner_list_key() -> String {
    BANNER_LIST_KEY.to_string()
}

/// 生成热搜词列表缓存键
pub fn hot_search_list_key() -> String {
    HOT_SEARCH_LIST_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_carry_entity_prefixes() {
        assert_eq!(goods_detail_key(42), "goods:detail:42");
        assert_eq!(goods_list_key("p1:s12"), "goods:list:p1:s12");
        assert_eq!(category_detail_key(3), "category:detail:3");
        assert_eq!(banner_list_key(), "banner:list");
        assert_eq!(hot_search_list_key(), "hotsearch:list");
    }
}
