// 轮播图查询操作

use sqlx::{Error as SqlxError, PgPool};

use crate::database::models::banner::BannerEntity;

/// 轮播图查询操作
pub struct BannerOperation {
    db: PgPool,
}

impl BannerOperation {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 全部轮播图，按配置的轮播顺序升序
    pub async fn list_ordered(&self) -> Result<Vec<BannerEntity>, SqlxError> {
        let banners = sqlx::query_as::<_, BannerEntity>(
            "SELECT id, goods_id, image, \"index\", add_time FROM banner \
             ORDER BY \"index\" ASC, id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(banners)
    }
}
