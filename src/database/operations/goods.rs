// 商品查询操作
// 列表查询的过滤、搜索、排序条件在这里拼装成 SQL

use sqlx::{Error as SqlxError, PgPool, Postgres, QueryBuilder};

use crate::database::models::goods::{GoodsEntity, GoodsImageEntity};

const GOODS_COLUMNS: &str = "id, category_id, goods_sn, name, click_num, sold_num, fav_num, \
     goods_num, market_price, shop_price, goods_brief, goods_desc, ship_free, \
     goods_front_image, is_new, is_hot, add_time";

/// 商品列表的过滤条件，各条件之间为 AND 关系
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoodsFilter {
    /// 本店价格下限
    pub pricemin: Option<f64>,
    /// 本店价格上限
    pub pricemax: Option<f64>,
    /// 是否热销
    pub is_hot: Option<bool>,
    /// 是否新品
    pub is_new: Option<bool>,
    /// 类目ID，匹配该类目及其三级树内所有子孙类目下的商品
    pub top_category: Option<i32>,
    /// 搜索输入，空白或逗号分隔；词之间为 AND，
    /// 每个词对名称、简介、详情做不区分大小写的子串匹配
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// 可参与排序的商品字段，对外只开放价格两项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoodsOrderField {
    MarketPrice,
    ShopPrice,
    GoodsNum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoodsOrder {
    pub field: GoodsOrderField,
    pub direction: SortDirection,
}

impl GoodsOrder {
    /// 解析 ordering 参数，逗号分隔，前缀 `-` 表示降序
    ///
    /// 白名单外的字段直接忽略；全部无效时调用方退回默认排序
    pub fn parse_list(raw: &str) -> Vec<GoodsOrder> {
        raw.split(',')
            .filter_map(|item| {
                let item = item.trim();
                let (name, direction) = match item.strip_prefix('-') {
                    Some(rest) => (rest, SortDirection::Descending),
                    None => (item, SortDirection::Ascending),
                };
                let field = match name {
                    "market_price" => GoodsOrderField::MarketPrice,
                    "shop_price" => GoodsOrderField::ShopPrice,
                    _ => return None,
                };
                Some(GoodsOrder { field, direction })
            })
            .collect()
    }

    /// 默认排序：库存数降序
    pub fn default_ordering() -> Vec<GoodsOrder> {
        vec![GoodsOrder {
            field: GoodsOrderField::GoodsNum,
            direction: SortDirection::Descending,
        }]
    }

    /// 缓存键里使用的排序签名，如 `-shop_price`
    pub fn signature(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.column().to_string(),
            SortDirection::Descending => format!("-{}", self.column()),
        }
    }

    fn column(&self) -> &'static str {
        match self.field {
            GoodsOrderField::MarketPrice => "market_price",
            GoodsOrderField::ShopPrice => "shop_price",
            GoodsOrderField::GoodsNum => "goods_num",
        }
    }

    fn direction_sql(&self) -> &'static str {
        match self.direction {
            SortDirection::Ascending => " ASC",
            SortDirection::Descending => " DESC",
        }
    }
}

/// 转义 LIKE 模式中的通配符，用户输入按字面匹配
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// 拆分搜索输入：空白和逗号都是分隔符，空片段丢弃
pub fn search_terms(raw: &str) -> Vec<&str> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .collect()
}

/// 商品查询操作，处理所有与商品相关的数据库读取
pub struct GoodsOperation {
    db: PgPool,
}

impl GoodsOperation {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 过滤后的商品总数
    pub async fn count(&self, filter: &GoodsFilter) -> Result<i64, SqlxError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM goods WHERE 1=1");
        Self::apply_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.db).await?;

        Ok(count)
    }

    /// 按过滤条件和排序取一页商品
    pub async fn list(
        &self,
        filter: &GoodsFilter,
        ordering: &[GoodsOrder],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GoodsEntity>, SqlxError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM goods WHERE 1=1",
            GOODS_COLUMNS
        ));
        Self::apply_filter(&mut builder, filter);
        Self::push_ordering(&mut builder, ordering);

        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let goods = builder
            .build_query_as::<GoodsEntity>()
            .fetch_all(&self.db)
            .await?;

        Ok(goods)
    }

    /// 根据ID查找商品
    pub async fn find_by_id(&self, goods_id: i32) -> Result<Option<GoodsEntity>, SqlxError> {
        let sql = format!("SELECT {} FROM goods WHERE id = $1", GOODS_COLUMNS);

        let goods = sqlx::query_as::<_, GoodsEntity>(&sql)
            .bind(goods_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(goods)
    }

    /// 点击数加一，返回商品是否存在
    ///
    /// 计数在数据库侧原子累加，不读回旧值
    pub async fn record_click(&self, goods_id: i32) -> Result<bool, SqlxError> {
        let result = sqlx::query("UPDATE goods SET click_num = click_num + 1 WHERE id = $1")
            .bind(goods_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 批量取商品的轮播图，避免逐个商品查询
    pub async fn images_for(&self, goods_ids: &[i32]) -> Result<Vec<GoodsImageEntity>, SqlxError> {
        if goods_ids.is_empty() {
            return Ok(Vec::new());
        }

        let images = sqlx::query_as::<_, GoodsImageEntity>(
            "SELECT id, goods_id, image, add_time FROM goods_image \
             WHERE goods_id = ANY($1) ORDER BY goods_id ASC, id ASC",
        )
        .bind(goods_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(images)
    }

    /// 取某类目树下最新上架的商品，供首页标签使用
    pub async fn find_newest_by_category_tree(
        &self,
        category_id: i32,
        limit: i64,
    ) -> Result<Vec<GoodsEntity>, SqlxError> {
        let filter = GoodsFilter {
            top_category: Some(category_id),
            ..GoodsFilter::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM goods WHERE 1=1",
            GOODS_COLUMNS
        ));
        Self::apply_filter(&mut builder, &filter);
        builder.push(" ORDER BY add_time DESC, id ASC LIMIT ");
        builder.push_bind(limit);

        let goods = builder
            .build_query_as::<GoodsEntity>()
            .fetch_all(&self.db)
            .await?;

        Ok(goods)
    }

    fn apply_filter(builder: &mut QueryBuilder<Postgres>, filter: &GoodsFilter) {
        if let Some(pricemin) = filter.pricemin {
            builder.push(" AND shop_price >= ");
            builder.push_bind(pricemin);
        }

        if let Some(pricemax) = filter.pricemax {
            builder.push(" AND shop_price <= ");
            builder.push_bind(pricemax);
        }

        if let Some(is_hot) = filter.is_hot {
            builder.push(" AND is_hot = ");
            builder.push_bind(is_hot);
        }

        if let Some(is_new) = filter.is_new {
            builder.push(" AND is_new = ");
            builder.push_bind(is_new);
        }

        // 类目树匹配：本级、子级、孙级任一命中即可
        if let Some(category_id) = filter.top_category {
            builder.push(
                " AND category_id IN (SELECT c.id FROM goods_category c \
                 LEFT JOIN goods_category p ON c.parent_category_id = p.id \
                 WHERE c.id = ",
            );
            builder.push_bind(category_id);
            builder.push(" OR c.parent_category_id = ");
            builder.push_bind(category_id);
            builder.push(" OR p.parent_category_id = ");
            builder.push_bind(category_id);
            builder.push(")");
        }

        // 多词搜索：词之间 AND，每个词在名称、简介、详情三个字段间 OR
        if let Some(search) = filter.search.as_deref() {
            for term in search_terms(search) {
                let pattern = format!("%{}%", escape_like(term));
                builder.push(" AND (name ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR goods_brief ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR goods_desc ILIKE ");
                builder.push_bind(pattern);
                builder.push(")");
            }
        }
    }

    fn push_ordering(builder: &mut QueryBuilder<Postgres>, ordering: &[GoodsOrder]) {
        // 空列表退回默认排序，避免拼出残缺的 ORDER BY
        let fallback = GoodsOrder::default_ordering();
        let ordering = if ordering.is_empty() {
            &fallback[..]
        } else {
            ordering
        };

        builder.push(" ORDER BY ");
        for (i, order) in ordering.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(order.column());
            builder.push(order.direction_sql());
        }
        // id 兜底，保证翻页时顺序稳定
        builder.push(", id ASC");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_sql(filter: &GoodsFilter) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM goods WHERE 1=1");
        GoodsOperation::apply_filter(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn empty_filter_adds_no_conditions() {
        assert_eq!(
            filter_sql(&GoodsFilter::default()),
            "SELECT COUNT(*) FROM goods WHERE 1=1"
        );
    }

    #[test]
    fn price_bounds_bind_in_order() {
        let sql = filter_sql(&GoodsFilter {
            pricemin: Some(10.0),
            pricemax: Some(99.5),
            ..GoodsFilter::default()
        });
        assert!(sql.contains("shop_price >= $1"));
        assert!(sql.contains("shop_price <= $2"));
    }

    #[test]
    fn flag_filters_use_equality() {
        let sql = filter_sql(&GoodsFilter {
            is_hot: Some(true),
            is_new: Some(false),
            ..GoodsFilter::default()
        });
        assert!(sql.contains("is_hot = $1"));
        assert!(sql.contains("is_new = $2"));
    }

    #[test]
    fn top_category_matches_three_levels() {
        let sql = filter_sql(&GoodsFilter {
            top_category: Some(7),
            ..GoodsFilter::default()
        });
        assert!(sql.contains("c.id = $1"));
        assert!(sql.contains("c.parent_category_id = $2"));
        assert!(sql.contains("p.parent_category_id = $3"));
    }

    #[test]
    fn search_spans_name_brief_and_desc() {
        let sql = filter_sql(&GoodsFilter {
            search: Some("茅台".to_string()),
            ..GoodsFilter::default()
        });
        assert!(sql.contains("name ILIKE $1"));
        assert!(sql.contains("goods_brief ILIKE $2"));
        assert!(sql.contains("goods_desc ILIKE $3"));
    }

    #[test]
    fn search_builds_one_group_per_term() {
        let sql = filter_sql(&GoodsFilter {
            search: Some("红 酒".to_string()),
            ..GoodsFilter::default()
        });
        // 两个词各占一组括号条件，组间 AND
        assert_eq!(sql.matches(" AND (name ILIKE ").count(), 2);
        assert_eq!(sql.matches("ILIKE").count(), 6);
        assert!(sql.contains("goods_desc ILIKE $3"));
        assert!(sql.contains("name ILIKE $4"));
        assert!(sql.contains("goods_desc ILIKE $6"));
    }

    #[test]
    fn search_terms_split_on_whitespace_and_commas() {
        assert_eq!(search_terms("红, 酒"), vec!["红", "酒"]);
        assert_eq!(search_terms("  茅台  "), vec!["茅台"]);
        assert_eq!(search_terms("红\t酒,52度"), vec!["红", "酒", "52度"]);
        assert!(search_terms(" , ").is_empty());
    }

    #[test]
    fn blank_search_is_ignored() {
        let sql = filter_sql(&GoodsFilter {
            search: Some(String::new()),
            ..GoodsFilter::default()
        });
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("普通词"), "普通词");
    }

    #[test]
    fn ordering_parse_respects_whitelist() {
        let orders = GoodsOrder::parse_list("shop_price,-market_price,click_num");
        assert_eq!(
            orders,
            vec![
                GoodsOrder {
                    field: GoodsOrderField::ShopPrice,
                    direction: SortDirection::Ascending,
                },
                GoodsOrder {
                    field: GoodsOrderField::MarketPrice,
                    direction: SortDirection::Descending,
                },
            ]
        );
    }

    #[test]
    fn ordering_parse_drops_garbage() {
        assert!(GoodsOrder::parse_list("click_num,,  ,name").is_empty());
    }

    #[test]
    fn ordering_sql_appends_stable_tiebreaker() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM goods");
        GoodsOperation::push_ordering(&mut builder, &GoodsOrder::default_ordering());
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM goods ORDER BY goods_num DESC, id ASC"
        );
    }

    #[test]
    fn ordering_sql_joins_multiple_fields() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM goods");
        GoodsOperation::push_ordering(&mut builder, &GoodsOrder::parse_list("shop_price,-market_price"));
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM goods ORDER BY shop_price ASC, market_price DESC, id ASC"
        );
    }

    #[test]
    fn ordering_sql_falls_back_when_list_empty() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM goods");
        GoodsOperation::push_ordering(&mut builder, &[]);
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM goods ORDER BY goods_num DESC, id ASC"
        );
    }
}
