use serde::{Deserialize, Serialize};

use super::{ChannelKind, DeliveryStatus, QuotaUsage};

/// How a dispatch invocation finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchDisposition {
    /// Channels were attempted; see the per-channel outcomes.
    Dispatched,
    /// The strategy's manual notification switch is off.
    NotificationsDisabled,
    /// No verified channels, or the tier does not include external notifications.
    NoEligibleChannels,
    /// Daily quota exhausted. A normal outcome, not an error: the signal was
    /// recorded upstream, it just was not notified externally.
    QuotaExhausted,
}

/// Per-channel outcome as reported back to the producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelOutcome {
    pub channel_kind: ChannelKind,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
}

/// Aggregate result of one dispatch invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    pub disposition: DispatchDisposition,
    pub notifications_sent: usize,
    pub outcomes: Vec<ChannelOutcome>,
    pub usage: Option<QuotaUsage>,
}

impl DispatchReport {
    /// Finalized report for a dispatch that never reached the fan-out step.
    pub fn skipped(disposition: DispatchDisposition) -> Self {
        Self {
            disposition,
            notifications_sent: 0,
            outcomes: Vec::new(),
            usage: None,
        }
    }
}
