// 类目查询操作

use sqlx::{Error as SqlxError, PgPool, Postgres, QueryBuilder};

use crate::database::models::category::CategoryEntity;

const CATEGORY_COLUMNS: &str =
    "id, name, code, description, category_type, parent_category_id, is_tab, add_time";

/// 一级类目列表的排序方式，只开放添加时间一个字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrdering {
    IdAsc,
    AddTimeAsc,
    AddTimeDesc,
}

impl CategoryOrdering {
    /// 解析 ordering 参数，逗号分隔，取第一个白名单内的字段
    ///
    /// 全部无效或缺省时退回默认的ID升序
    pub fn parse(raw: Option<&str>) -> Self {
        raw.into_iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .find_map(|item| match item {
                "add_time" => Some(CategoryOrdering::AddTimeAsc),
                "-add_time" => Some(CategoryOrdering::AddTimeDesc),
                _ => None,
            })
            .unwrap_or(CategoryOrdering::IdAsc)
    }

    fn order_clause(self) -> &'static str {
        match self {
            CategoryOrdering::IdAsc => " ORDER BY id ASC",
            CategoryOrdering::AddTimeAsc => " ORDER BY add_time ASC, id ASC",
            CategoryOrdering::AddTimeDesc => " ORDER BY add_time DESC, id ASC",
        }
    }

    /// 参与缓存键的签名
    pub fn signature(self) -> &'static str {
        match self {
            CategoryOrdering::IdAsc => "id",
            CategoryOrdering::AddTimeAsc => "add_time",
            CategoryOrdering::AddTimeDesc => "-add_time",
        }
    }
}

/// 类目查询操作，处理所有与类目相关的数据库读取
pub struct CategoryOperation {
    db: PgPool,
}

impl CategoryOperation {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 一级类目列表
    ///
    /// category_type 参数与一级约束取交集：传1等于不传，传其他层级结果为空，
    /// 与列表接口固定查询一级类目的行为保持一致
    pub async fn find_top_level(
        &self,
        category_type: Option<i32>,
        ordering: CategoryOrdering,
    ) -> Result<Vec<CategoryEntity>, SqlxError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM goods_category WHERE category_type = 1",
            CATEGORY_COLUMNS
        ));

        if let Some(category_type) = category_type {
            builder.push(" AND category_type = ");
            builder.push_bind(category_type);
        }

        builder.push(ordering.order_clause());

        let categories = builder
            .build_query_as::<CategoryEntity>()
            .fetch_all(&self.db)
            .await?;

        Ok(categories)
    }

    /// 按ID查找一级类目；非一级类目按不存在处理
    pub async fn find_top_level_by_id(
        &self,
        category_id: i32,
    ) -> Result<Option<CategoryEntity>, SqlxError> {
        let sql = format!(
            "SELECT {} FROM goods_category WHERE id = $1 AND category_type = 1",
            CATEGORY_COLUMNS
        );

        let category = sqlx::query_as::<_, CategoryEntity>(&sql)
            .bind(category_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(category)
    }

    /// 批量按ID取类目，不限层级，供商品数据拼装使用
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<CategoryEntity>, SqlxError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM goods_category WHERE id = ANY($1) ORDER BY id ASC",
            CATEGORY_COLUMNS
        );

        let categories = sqlx::query_as::<_, CategoryEntity>(&sql)
            .bind(ids)
            .fetch_all(&self.db)
            .await?;

        Ok(categories)
    }

    /// 批量取下一级类目，供树形结构拼装使用
    pub async fn find_children(&self, parent_ids: &[i32]) -> Result<Vec<CategoryEntity>, SqlxError> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM goods_category WHERE parent_category_id = ANY($1) ORDER BY id ASC",
            CATEGORY_COLUMNS
        );

        let categories = sqlx::query_as::<_, CategoryEntity>(&sql)
            .bind(parent_ids)
            .fetch_all(&self.db)
            .await?;

        Ok(categories)
    }

    /// 首页标签类目：is_tab 且名称在运营配置的集合内
    pub async fn find_tabs(&self, names: &[String]) -> Result<Vec<CategoryEntity>, SqlxError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM goods_category WHERE is_tab = TRUE AND name = ANY($1) ORDER BY id ASC",
            CATEGORY_COLUMNS
        );

        let categories = sqlx::query_as::<_, CategoryEntity>(&sql)
            .bind(names)
            .fetch_all(&self.db)
            .await?;

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_parse_accepts_add_time_both_ways() {
        assert_eq!(
            CategoryOrdering::parse(Some("add_time")),
            CategoryOrdering::AddTimeAsc
        );
        assert_eq!(
            CategoryOrdering::parse(Some("-add_time")),
            CategoryOrdering::AddTimeDesc
        );
    }

    #[test]
    fn ordering_parse_defaults_to_id() {
        assert_eq!(CategoryOrdering::parse(None), CategoryOrdering::IdAsc);
        assert_eq!(
            CategoryOrdering::parse(Some("name")),
            CategoryOrdering::IdAsc
        );
        assert_eq!(CategoryOrdering::parse(Some("")), CategoryOrdering::IdAsc);
    }

    #[test]
    fn ordering_parse_scans_comma_list_for_whitelisted_field() {
        assert_eq!(
            CategoryOrdering::parse(Some("add_time,id")),
            CategoryOrdering::AddTimeAsc
        );
        assert_eq!(
            CategoryOrdering::parse(Some("id, -add_time")),
            CategoryOrdering::AddTimeDesc
        );
        assert_eq!(
            CategoryOrdering::parse(Some("name,code")),
            CategoryOrdering::IdAsc
        );
    }

    #[test]
    fn ordering_clause_keeps_stable_tiebreaker() {
        assert_eq!(
            CategoryOrdering::AddTimeDesc.order_clause(),
            " ORDER BY add_time DESC, id ASC"
        );
        assert_eq!(CategoryOrdering::IdAsc.order_clause(), " ORDER BY id ASC");
    }
}
