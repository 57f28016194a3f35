// 热搜词查询操作

use sqlx::{Error as SqlxError, PgPool};

use crate::database::models::hot_search::HotSearchWordEntity;

/// 热搜词查询操作
pub struct HotSearchOperation {
    db: PgPool,
}

impl HotSearchOperation {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 全部热搜词，按展示顺序升序
    pub async fn list_ordered(&self) -> Result<Vec<HotSearchWordEntity>, SqlxError> {
        let words = sqlx::query_as::<_, HotSearchWordEntity>(
            "SELECT id, keywords, \"index\", add_time FROM hot_search_word \
             ORDER BY \"index\" ASC, id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(words)
    }
}
