use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join;
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::cache::keys;
use crate::cache::operations::{try_get_cached, try_set_cached};
use crate::database::models::category::CategoryEntity;
use crate::database::models::goods::{GoodsEntity, GoodsImageEntity};
use crate::database::operations::category::CategoryOperation;
use crate::database::operations::goods::{GoodsFilter, GoodsOperation, GoodsOrder, search_terms};
use crate::utils::pagination::{PaginatedResponse, Pagination, page_offset};

/// 列表缓存过期时间（秒），过滤组合多，放短一些
const GOODS_LIST_CACHE_EXPIRE: u64 = 120;
/// 详情缓存过期时间（秒）
const GOODS_DETAIL_CACHE_EXPIRE: u64 = 600;

/// 规范化后的商品列表查询参数
#[derive(Debug, Clone)]
pub struct GoodsListParams {
    pub page: u32,
    pub page_size: u32,
    pub filter: GoodsFilter,
    pub ordering: Vec<GoodsOrder>,
}

impl GoodsListParams {
    /// 参数的规范化签名，作为列表缓存键
    ///
    /// 同一组参数必须生成同一个键，字段顺序固定，缺省值记为 `-`；
    /// 搜索部分按拆分后的词记录，分隔写法不同的同义查询共用一个键
    pub fn signature(&self) -> String {
        let ordering = self
            .ordering
            .iter()
            .map(|order| order.signature())
            .collect::<Vec<_>>()
            .join(",");

        let search = self
            .filter
            .search
            .as_deref()
            .map(|raw| search_terms(raw).join(","))
            .filter(|terms| !terms.is_empty())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "p{}:s{}:pm{}:px{}:h{}:n{}:c{}:q{}:o{}",
            self.page,
            self.page_size,
            opt_sig(&self.filter.pricemin),
            opt_sig(&self.filter.pricemax),
            opt_sig(&self.filter.is_hot),
            opt_sig(&self.filter.is_new),
            opt_sig(&self.filter.top_category),
            search,
            ordering,
        )
    }
}

fn opt_sig<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(inner) => inner.to_string(),
        None => "-".to_string(),
    }
}

/// 商品所属类目，平铺不带子级
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoodsCategory {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub category_type: i32,
    pub parent_category_id: Option<i32>,
    pub is_tab: bool,
}

impl From<&CategoryEntity> for GoodsCategory {
    fn from(entity: &CategoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            code: entity.code.clone(),
            category_type: entity.category_type,
            parent_category_id: entity.parent_category_id,
            is_tab: entity.is_tab,
        }
    }
}

/// 商品信息，带所属类目和轮播图
#[derive(Debug, Serialize, Deserialize)]
pub struct GoodsInfo {
    pub id: i32,
    pub goods_sn: String,
    pub name: String,
    pub click_num: i32,
    pub sold_num: i32,
    pub fav_num: i32,
    pub goods_num: i32,
    pub market_price: f64,
    pub shop_price: f64,
    pub goods_brief: String,
    pub goods_desc: String,
    pub ship_free: bool,
    pub goods_front_image: Option<String>,
    pub is_new: bool,
    pub is_hot: bool,
    pub add_time: DateTime<Utc>,
    pub category: Option<GoodsCategory>,
    pub images: Vec<String>,
}

impl GoodsInfo {
    /// 查询一页商品，带总数
    ///
    /// 先查缓存，未命中再查数据库并回填；类目和轮播图按整页批量取
    pub async fn page(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
        params: &GoodsListParams,
    ) -> Result<PaginatedResponse<GoodsInfo>, sqlx::Error> {
        let cache_key = keys::goods_list_key(&params.signature());
        if let Some(cached) = try_get_cached::<PaginatedResponse<GoodsInfo>>(redis, &cache_key).await
        {
            return Ok(cached);
        }

        let goods_op = GoodsOperation::new(pool.clone());
        let limit = i64::from(params.page_size);
        let offset = page_offset(params.page, params.page_size);

        let (total, goods) = try_join(
            goods_op.count(&params.filter),
            goods_op.list(&params.filter, &params.ordering, limit, offset),
        )
        .await?;

        let goods_ids: Vec<i32> = goods.iter().map(|item| item.id).collect();
        let mut category_ids: Vec<i32> = goods.iter().map(|item| item.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let category_op = CategoryOperation::new(pool.clone());
        let (categories, images) = try_join(
            category_op.find_by_ids(&category_ids),
            goods_op.images_for(&goods_ids),
        )
        .await?;

        let page = PaginatedResponse {
            items: assemble(goods, &categories, images),
            pagination: Pagination {
                page: params.page,
                page_size: params.page_size,
                total: total as u64,
            },
        };

        try_set_cached(redis, &cache_key, &page, GOODS_LIST_CACHE_EXPIRE).await;

        Ok(page)
    }

    /// 查询单个商品详情，不存在返回 None
    ///
    /// 点击计数先于缓存执行，缓存命中的访问同样要累加；
    /// 计数失败只记日志，不影响本次读取
    pub async fn retrieve(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
        goods_id: i32,
    ) -> Result<Option<GoodsInfo>, sqlx::Error> {
        let goods_op = GoodsOperation::new(pool.clone());

        match goods_op.record_click(goods_id).await {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => {
                tracing::warn!("记录商品{}点击数失败: {}", goods_id, e);
            }
        }

        let cache_key = keys::goods_detail_key(goods_id);
        if let Some(cached) = try_get_cached::<GoodsInfo>(redis, &cache_key).await {
            return Ok(Some(cached));
        }

        let goods = match goods_op.find_by_id(goods_id).await? {
            Some(goods) => goods,
            None => return Ok(None),
        };

        let category_op = CategoryOperation::new(pool.clone());
        let (categories, images) = try_join(
            category_op.find_by_ids(&[goods.category_id]),
            goods_op.images_for(&[goods.id]),
        )
        .await?;

        let info = assemble(vec![goods], &categories, images).pop();
        if let Some(info) = info.as_ref() {
            try_set_cached(redis, &cache_key, info, GOODS_DETAIL_CACHE_EXPIRE).await;
        }

        Ok(info)
    }
}

/// 把商品、类目、轮播图三份查询结果拼成响应结构
fn assemble(
    goods: Vec<GoodsEntity>,
    categories: &[CategoryEntity],
    images: Vec<GoodsImageEntity>,
) -> Vec<GoodsInfo> {
    let category_map: HashMap<i32, GoodsCategory> = categories
        .iter()
        .map(|entity| (entity.id, GoodsCategory::from(entity)))
        .collect();

    let mut image_map: HashMap<i32, Vec<String>> = HashMap::new();
    for image in images {
        image_map.entry(image.goods_id).or_default().push(image.image);
    }

    goods
        .into_iter()
        .map(|entity| GoodsInfo {
            category: category_map.get(&entity.category_id).cloned(),
            images: image_map.remove(&entity.id).unwrap_or_default(),
            id: entity.id,
            goods_sn: entity.goods_sn,
            name: entity.name,
            click_num: entity.click_num,
            sold_num: entity.sold_num,
            fav_num: entity.fav_num,
            goods_num: entity.goods_num,
            market_price: entity.market_price,
            shop_price: entity.shop_price,
            goods_brief: entity.goods_brief,
            goods_desc: entity.goods_desc,
            ship_free: entity.ship_free,
            goods_front_image: entity.goods_front_image,
            is_new: entity.is_new,
            is_hot: entity.is_hot,
            add_time: entity.add_time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::operations::goods::{GoodsOrderField, SortDirection};
    use chrono::TimeZone;

    fn goods_entity(id: i32, category_id: i32) -> GoodsEntity {
        GoodsEntity {
            id,
            category_id,
            goods_sn: format!("sn-{}", id),
            name: format!("商品{}", id),
            click_num: 0,
            sold_num: 0,
            fav_num: 0,
            goods_num: 10,
            market_price: 100.0,
            shop_price: 88.0,
            goods_brief: "简介".to_string(),
            goods_desc: "详情".to_string(),
            ship_free: true,
            goods_front_image: None,
            is_new: false,
            is_hot: false,
            add_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn category_entity(id: i32) -> CategoryEntity {
        CategoryEntity {
            id,
            name: format!("类目{}", id),
            code: format!("cat{}", id),
            description: String::new(),
            category_type: 1,
            parent_category_id: None,
            is_tab: false,
            add_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn image_entity(id: i32, goods_id: i32) -> GoodsImageEntity {
        GoodsImageEntity {
            id,
            goods_id,
            image: format!("http://img/{}.jpg", id),
            add_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn assemble_attaches_category_and_images() {
        let goods = vec![goods_entity(1, 10), goods_entity(2, 20)];
        let categories = vec![category_entity(10)];
        let images = vec![image_entity(100, 1), image_entity(101, 1)];

        let infos = assemble(goods, &categories, images);

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].category.as_ref().map(|c| c.id), Some(10));
        assert_eq!(
            infos[0].images,
            vec![
                "http://img/100.jpg".to_string(),
                "http://img/101.jpg".to_string()
            ]
        );
        assert!(infos[1].category.is_none());
        assert!(infos[1].images.is_empty());
    }

    #[test]
    fn signature_is_stable_for_same_params() {
        let params = GoodsListParams {
            page: 2,
            page_size: 12,
            filter: GoodsFilter {
                pricemin: Some(10.0),
                is_hot: Some(true),
                search: Some("酒".to_string()),
                ..GoodsFilter::default()
            },
            ordering: vec![GoodsOrder {
                field: GoodsOrderField::ShopPrice,
                direction: SortDirection::Descending,
            }],
        };

        assert_eq!(params.signature(), "p2:s12:pm10:px-:htrue:n-:c-:q酒:o-shop_price");
        assert_eq!(params.signature(), params.signature());
    }

    #[test]
    fn signature_differs_when_filter_changes() {
        let base = GoodsListParams {
            page: 1,
            page_size: 12,
            filter: GoodsFilter::default(),
            ordering: GoodsOrder::default_ordering(),
        };
        let mut other = base.clone();
        other.filter.top_category = Some(3);

        assert_ne!(base.signature(), other.signature());
    }

    #[test]
    fn signature_normalizes_search_separators() {
        let base = GoodsListParams {
            page: 1,
            page_size: 12,
            filter: GoodsFilter {
                search: Some("红 酒".to_string()),
                ..GoodsFilter::default()
            },
            ordering: GoodsOrder::default_ordering(),
        };
        let mut commas = base.clone();
        commas.filter.search = Some(" 红,酒 ".to_string());

        assert_eq!(base.signature(), commas.signature());
        assert!(base.signature().contains(":q红,酒:"));
    }

    // 依赖数据库的用例默认忽略，用 `cargo test -- --ignored` 单独执行；
    // migrations 由测试框架对临时库自动套用
    #[ignore = "需要 DATABASE_URL 指向可用的 Postgres"]
    #[sqlx::test]
    async fn retrieve_increments_click_counter_every_time(pool: PgPool) {
        sqlx::query("INSERT INTO goods_category (id, name, category_type) VALUES (1, '酒水饮料', 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO goods (id, category_id, name) VALUES (1, 1, '老白干')")
            .execute(&pool)
            .await
            .unwrap();

        let redis = Arc::new(RedisClient::open("redis://127.0.0.1:6379").unwrap());

        GoodsInfo::retrieve(&pool, &redis, 1).await.unwrap().unwrap();
        let clicks: i32 = sqlx::query_scalar("SELECT click_num FROM goods WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(clicks, 1);

        // 第二次读取可能由缓存应答，点击数照样累加
        GoodsInfo::retrieve(&pool, &redis, 1).await.unwrap().unwrap();
        let clicks: i32 = sqlx::query_scalar("SELECT click_num FROM goods WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(clicks, 2);
    }

    #[ignore = "需要 DATABASE_URL 指向可用的 Postgres"]
    #[sqlx::test]
    async fn retrieve_missing_goods_returns_none(pool: PgPool) {
        let redis = Arc::new(RedisClient::open("redis://127.0.0.1:6379").unwrap());
        let found = GoodsInfo::retrieve(&pool, &redis, 9999).await.unwrap();
        assert!(found.is_none());
    }
}
