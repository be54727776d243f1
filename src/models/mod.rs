pub mod channel;
pub mod delivery;
pub mod quota;
pub mod report;
pub mod signal;
pub mod strategy;

pub use channel::{ChannelKind, NotificationChannel};
pub use delivery::{DeliveryAttempt, DeliveryLogEntry, DeliveryOutcome, DeliveryStatus};
pub use quota::{QuotaRecord, QuotaUsage};
pub use report::{ChannelOutcome, DispatchDisposition, DispatchReport};
pub use signal::{SignalEvent, SignalKind};
pub use strategy::{StrategyConfig, SubscriptionTier, DEFAULT_DAILY_SIGNAL_LIMIT};
