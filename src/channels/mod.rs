pub mod discord;
pub mod email;
pub mod telegram;

use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;

use crate::models::{DeliveryOutcome, NotificationChannel, SignalEvent};

pub use email::EmailProviderConfig;

/// Delivery seam between the coordinator and the channel adapters. Sends
/// always resolve to an outcome; a panicking adapter is mapped to a failed
/// outcome at this boundary so one channel can never abort its siblings or
/// the logging and quota steps.
#[async_trait]
pub trait SignalSender: Send + Sync {
    async fn send(&self, channel: &NotificationChannel, signal: &SignalEvent) -> DeliveryOutcome;
}

/// Production sender: one shared HTTP client across all adapters.
pub struct HttpSender {
    http: reqwest::Client,
    email: EmailProviderConfig,
}

impl HttpSender {
    pub fn new(email: EmailProviderConfig, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, email })
    }
}

#[async_trait]
impl SignalSender for HttpSender {
    async fn send(&self, channel: &NotificationChannel, signal: &SignalEvent) -> DeliveryOutcome {
        let fut = async {
            match channel {
                NotificationChannel::Email { address, .. } => {
                    email::send(&self.http, &self.email, address, signal).await
                }
                NotificationChannel::Discord { webhook_url, .. } => {
                    discord::send(&self.http, webhook_url, signal).await
                }
                NotificationChannel::Telegram {
                    bot_token, chat_id, ..
                } => telegram::send(&self.http, bot_token, chat_id, signal).await,
            }
        };

        match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(channel = %channel.kind(), "Channel adapter panicked");
                DeliveryOutcome::failed("adapter panicked")
            }
        }
    }
}
