use std::env;
use std::time::Duration;

/// Service configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Transactional email provider (HTTP API)
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,

    // Dispatch tuning
    pub channel_timeout_secs: u64,
    pub dispatch_timeout_secs: u64,

    // Quota retention
    pub retention_days: u64,
    pub sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            email_api_url: env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".into()),
            email_api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "signals@signalcast.app".into()),

            channel_timeout_secs: parse_env_or("CHANNEL_TIMEOUT_SECS", 8),
            dispatch_timeout_secs: parse_env_or("DISPATCH_TIMEOUT_SECS", 20),

            // Keeps today and yesterday by default
            retention_days: parse_env_or("QUOTA_RETENTION_DAYS", 1),
            sweep_interval_secs: parse_env_or("QUOTA_SWEEP_INTERVAL_SECS", 21_600),
        })
    }

    pub fn channel_timeout(&self) -> Duration {
        Duration::from_secs(self.channel_timeout_secs)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }
}

fn parse_env_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
