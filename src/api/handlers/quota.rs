use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use super::ApiResponse;
use crate::dispatch::ledger::quota_day;
use crate::models::QuotaUsage;
use crate::AppState;

/// Current notification quota usage for a strategy, for the dashboard widget.
pub async fn usage(
    State(state): State<AppState>,
    Path(strategy_id): Path<Uuid>,
) -> Json<ApiResponse<QuotaUsage>> {
    let day = quota_day(Utc::now());

    match state.ledger.usage(strategy_id, day).await {
        Ok(record) => Json(ApiResponse::ok(record.usage())),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}
