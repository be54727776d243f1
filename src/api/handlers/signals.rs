use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiResponse;
use crate::errors::AppError;
use crate::models::{DispatchReport, SignalEvent, StrategyConfig};
use crate::AppState;

/// Ingest boundary for the strategy evaluation engine.
#[derive(Deserialize)]
pub struct DispatchRequest {
    pub signal: SignalEvent,
    pub config: StrategyConfig,
}

/// Dispatch one signal. Channel failures are report content, never an HTTP
/// error — the producer must not see a notification problem as a signal
/// problem. Only a structurally invalid signal yields a 400.
pub async fn dispatch(
    State(state): State<AppState>,
    Json(req): Json<DispatchRequest>,
) -> Result<Json<ApiResponse<DispatchReport>>, AppError> {
    let report = state
        .dispatcher
        .on_signal_generated(&req.signal, &req.config)
        .await?;

    Ok(Json(ApiResponse::ok(report)))
}
