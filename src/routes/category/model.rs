use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::cache::keys;
use crate::cache::operations::{try_get_cached, try_set_cached};
use crate::database::models::category::CategoryEntity;
use crate::database::models::goods::GoodsEntity;
use crate::database::operations::category::{CategoryOperation, CategoryOrdering};
use crate::database::operations::goods::GoodsOperation;

const CATEGORY_LIST_CACHE_EXPIRE: u64 = 600;
const CATEGORY_DETAIL_CACHE_EXPIRE: u64 = 600;
const INDEX_CATEGORY_CACHE_EXPIRE: u64 = 300;

/// 首页每个标签类目附带的商品数量
const INDEX_GOODS_LIMIT: i64 = 12;

/// 类目树节点，子类目挂在 sub_cat 下，最多三层
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: String,
    pub category_type: i32,
    pub parent_category_id: Option<i32>,
    pub is_tab: bool,
    pub add_time: DateTime<Utc>,
    pub sub_cat: Vec<CategoryNode>,
}

impl CategoryNode {
    fn from_entity(entity: &CategoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            code: entity.code.clone(),
            description: entity.description.clone(),
            category_type: entity.category_type,
            parent_category_id: entity.parent_category_id,
            is_tab: entity.is_tab,
            add_time: entity.add_time,
            sub_cat: Vec::new(),
        }
    }

    /// 一级类目列表，每项带两层子类目
    pub async fn list(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
        category_type: Option<i32>,
        ordering: CategoryOrdering,
    ) -> Result<Vec<CategoryNode>, sqlx::Error> {
        let signature = format!(
            "t{}:o{}",
            category_type.map_or("-".to_string(), |t| t.to_string()),
            ordering.signature(),
        );
        let cache_key = keys::category_list_key(&signature);
        if let Some(cached) = try_get_cached::<Vec<CategoryNode>>(redis, &cache_key).await {
            return Ok(cached);
        }

        let category_op = CategoryOperation::new(pool.clone());
        let roots = category_op.find_top_level(category_type, ordering).await?;
        let tree = load_subtree(&category_op, roots).await?;

        try_set_cached(redis, &cache_key, &tree, CATEGORY_LIST_CACHE_EXPIRE).await;

        Ok(tree)
    }

    /// 单个一级类目，带两层子类目，不存在返回 None
    pub async fn retrieve(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
        category_id: i32,
    ) -> Result<Option<CategoryNode>, sqlx::Error> {
        let cache_key = keys::category_detail_key(category_id);
        if let Some(cached) = try_get_cached::<CategoryNode>(redis, &cache_key).await {
            return Ok(Some(cached));
        }

        let category_op = CategoryOperation::new(pool.clone());
        let root = match category_op.find_top_level_by_id(category_id).await? {
            Some(root) => root,
            None => return Ok(None),
        };

        let node = load_subtree(&category_op, vec![root]).await?.pop();
        if let Some(node) = node.as_ref() {
            try_set_cached(redis, &cache_key, node, CATEGORY_DETAIL_CACHE_EXPIRE).await;
        }

        Ok(node)
    }
}

/// 首页标签类目，带子类目树和该类目树下最新上架的商品
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexCategory {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub category_type: i32,
    pub is_tab: bool,
    pub sub_cat: Vec<CategoryNode>,
    pub goods: Vec<IndexGoods>,
}

/// 首页标签下展示的商品摘要
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexGoods {
    pub id: i32,
    pub name: String,
    pub shop_price: f64,
    pub market_price: f64,
    pub goods_front_image: Option<String>,
    pub is_new: bool,
    pub is_hot: bool,
}

impl From<GoodsEntity> for IndexGoods {
    fn from(entity: GoodsEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            shop_price: entity.shop_price,
            market_price: entity.market_price,
            goods_front_image: entity.goods_front_image,
            is_new: entity.is_new,
            is_hot: entity.is_hot,
        }
    }
}

impl IndexCategory {
    /// 首页标签类目列表
    ///
    /// 只取配置里点名的标签类目，商品按上架时间取最新一批
    pub async fn list(
        pool: &PgPool,
        redis: &Arc<RedisClient>,
        tab_names: &[String],
    ) -> Result<Vec<IndexCategory>, sqlx::Error> {
        let cache_key = keys::index_category_key();
        if let Some(cached) = try_get_cached::<Vec<IndexCategory>>(redis, &cache_key).await {
            return Ok(cached);
        }

        let category_op = CategoryOperation::new(pool.clone());
        let goods_op = GoodsOperation::new(pool.clone());

        let tabs = category_op.find_tabs(tab_names).await?;
        let nodes = load_subtree(&category_op, tabs).await?;

        let mut result = Vec::with_capacity(nodes.len());
        for node in nodes {
            let goods = goods_op
                .find_newest_by_category_tree(node.id, INDEX_GOODS_LIMIT)
                .await?;

            result.push(IndexCategory {
                id: node.id,
                name: node.name,
                code: node.code,
                category_type: node.category_type,
                is_tab: node.is_tab,
                sub_cat: node.sub_cat,
                goods: goods.into_iter().map(IndexGoods::from).collect(),
            });
        }

        try_set_cached(redis, &cache_key, &result, INDEX_CATEGORY_CACHE_EXPIRE).await;

        Ok(result)
    }
}

/// 往下取两层子类目并拼成树
async fn load_subtree(
    category_op: &CategoryOperation,
    roots: Vec<CategoryEntity>,
) -> Result<Vec<CategoryNode>, sqlx::Error> {
    let root_ids: Vec<i32> = roots.iter().map(|entity| entity.id).collect();
    let children = category_op.find_children(&root_ids).await?;

    let child_ids: Vec<i32> = children.iter().map(|entity| entity.id).collect();
    let grandchildren = category_op.find_children(&child_ids).await?;

    Ok(build_tree(roots, children, grandchildren))
}

/// 把三层平铺查询结果拼成树，子节点保持查询时的ID升序
fn build_tree(
    roots: Vec<CategoryEntity>,
    children: Vec<CategoryEntity>,
    grandchildren: Vec<CategoryEntity>,
) -> Vec<CategoryNode> {
    let mut grandchild_map: HashMap<i32, Vec<CategoryNode>> = HashMap::new();
    for entity in &grandchildren {
        if let Some(parent_id) = entity.parent_category_id {
            grandchild_map
                .entry(parent_id)
                .or_default()
                .push(CategoryNode::from_entity(entity));
        }
    }

    let mut child_map: HashMap<i32, Vec<CategoryNode>> = HashMap::new();
    for entity in &children {
        if let Some(parent_id) = entity.parent_category_id {
            let mut node = CategoryNode::from_entity(entity);
            node.sub_cat = grandchild_map.remove(&entity.id).unwrap_or_default();
            child_map.entry(parent_id).or_default().push(node);
        }
    }

    roots
        .iter()
        .map(|entity| {
            let mut node = CategoryNode::from_entity(entity);
            node.sub_cat = child_map.remove(&entity.id).unwrap_or_default();
            node
        })
        .collect()
}
