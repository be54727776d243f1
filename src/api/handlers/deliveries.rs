use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::models::DeliveryLogEntry;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Deserialize)]
pub struct ListParams {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

/// Newest-first delivery history for the notification log view.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ApiResponse<Vec<DeliveryLogEntry>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    match state.delivery_log.list_for_user(params.user_id, limit).await {
        Ok(entries) => Json(ApiResponse::ok(entries)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}
