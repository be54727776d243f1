use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("dispatches_total").absolute(0);
    counter!("notifications_sent_total").absolute(0);
    counter!("notifications_failed_total").absolute(0);
    counter!("quota_rejections_total").absolute(0);
    counter!("quota_failopen_total").absolute(0);
    counter!("delivery_log_append_failures_total").absolute(0);
    counter!("quota_records_swept_total").absolute(0);

    handle
}
