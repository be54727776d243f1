use std::sync::Arc;

use chrono::{Days, Utc};
use metrics::counter;
use tokio::time::{interval, Duration};

use crate::dispatch::ledger::{quota_day, QuotaLedger};

/// Run the quota retention sweeper loop. Periodically purges quota records
/// older than the retention window; the window always keeps at least
/// yesterday so the dashboard can show a day-over-day comparison.
pub async fn run_retention_sweeper(
    ledger: Arc<dyn QuotaLedger>,
    retention_days: u64,
    interval_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        let today = quota_day(Utc::now());
        let Some(retain_since) = today.checked_sub_days(Days::new(retention_days)) else {
            tracing::error!(retention_days, "Retention window underflowed — skipping sweep");
            continue;
        };

        match ledger.sweep(retain_since).await {
            Ok(0) => tracing::debug!("Retention sweep: nothing to purge"),
            Ok(removed) => {
                counter!("quota_records_swept_total").increment(removed);
                tracing::info!(removed, %retain_since, "Purged expired quota records");
            }
            Err(e) => tracing::error!(error = %e, "Retention sweep failed"),
        }
    }
}
