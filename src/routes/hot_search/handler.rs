use axum::{Json, extract::State, http::StatusCode};
use tracing::error;

use crate::{
    AppState,
    utils::{ApiResponse, error_codes, error_to_api_response, success_to_api_response},
};

use super::model::HotSearchWordInfo;

/// 热门搜索词接口
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<HotSearchWordInfo>>>) {
    match HotSearchWordInfo::list(&state.pool, &state.redis).await {
        Ok(words) => (StatusCode::OK, success_to_api_response(words)),
        Err(e) => {
            error!("查询热搜词失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "查询热搜词失败".to_string()),
            )
        }
    }
}
