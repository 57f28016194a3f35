use axum::{Json, extract::State, http::StatusCode};
use tracing::error;

use crate::{
    AppState,
    utils::{ApiResponse, error_codes, error_to_api_response, success_to_api_response},
};

use super::model::BannerInfo;

/// 首页轮播图接口
#[axum::debug_handler]
pub async fn list(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<Vec<BannerInfo>>>) {
    match BannerInfo::list(&state.pool, &state.redis).await {
        Ok(banners) => (StatusCode::OK, success_to_api_response(banners)),
        Err(e) => {
            error!("查询轮播图失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "查询轮播图失败".to_string()),
            )
        }
    }
}
