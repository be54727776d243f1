use std::sync::Arc;

use signalcast::api::router::create_router;
use signalcast::channels::{EmailProviderConfig, HttpSender};
use signalcast::config::AppConfig;
use signalcast::dispatch::coordinator::{Dispatcher, DispatcherConfig};
use signalcast::dispatch::ledger::{PgQuotaLedger, QuotaLedger};
use signalcast::dispatch::log::{DeliveryLog, PgDeliveryLog};
use signalcast::services::retention::run_retention_sweeper;
use signalcast::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = metrics::init_metrics();

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database connected, migrations applied");

    let ledger: Arc<dyn QuotaLedger> = Arc::new(PgQuotaLedger::new(db.clone()));
    let delivery_log: Arc<dyn DeliveryLog> = Arc::new(PgDeliveryLog::new(db.clone()));

    let sender = HttpSender::new(
        EmailProviderConfig {
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from_address: config.email_from.clone(),
        },
        config.channel_timeout(),
    )?;

    let dispatcher = Dispatcher::new(
        Arc::clone(&ledger),
        Arc::clone(&delivery_log),
        Arc::new(sender),
        DispatcherConfig {
            channel_timeout: config.channel_timeout(),
            dispatch_timeout: config.dispatch_timeout(),
        },
    );

    // --- Quota retention sweeper ---
    {
        let sweeper_ledger = Arc::clone(&ledger);
        let retention_days = config.retention_days;
        let interval_secs = config.sweep_interval_secs;
        tokio::spawn(async move {
            run_retention_sweeper(sweeper_ledger, retention_days, interval_secs).await;
        });
        tracing::info!(retention_days, interval_secs, "Retention sweeper spawned");
    }

    let state = AppState {
        db,
        config,
        dispatcher,
        ledger,
        delivery_log,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
