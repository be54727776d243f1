pub mod api;
pub mod channels;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dispatch::coordinator::Dispatcher;
use crate::dispatch::ledger::QuotaLedger;
use crate::dispatch::log::DeliveryLog;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub dispatcher: Dispatcher,
    pub ledger: Arc<dyn QuotaLedger>,
    pub delivery_log: Arc<dyn DeliveryLog>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
