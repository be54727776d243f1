use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NotificationChannel;

/// Strategy-configured cap applied when the producer does not supply one.
pub const DEFAULT_DAILY_SIGNAL_LIMIT: i32 = 5;

/// Subscription tier of the strategy owner. External notifications are a paid
/// capability; in-app signal recording happens upstream regardless of tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Premium,
}

impl SubscriptionTier {
    /// External notification dispatch requires Pro or above.
    pub fn allows_external_notifications(&self) -> bool {
        *self >= SubscriptionTier::Pro
    }
}

/// Per-strategy dispatch configuration, supplied by the producer alongside
/// each signal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub strategy_id: Uuid,
    pub user_id: Uuid,
    #[serde(default = "default_daily_limit")]
    pub daily_signal_limit: i32,
    /// Manual on/off switch for external notifications, independent of quota.
    pub signal_notifications_enabled: bool,
    pub tier: SubscriptionTier,
    pub channels: Vec<NotificationChannel>,
}

fn default_daily_limit() -> i32 {
    DEFAULT_DAILY_SIGNAL_LIMIT
}
