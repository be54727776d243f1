use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::ChannelKind;

/// Outcome status of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Pending,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Pending => "pending",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(DeliveryStatus::Sent),
            "failed" => Some(DeliveryStatus::Failed),
            "pending" => Some(DeliveryStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single channel send. Adapters always resolve to an outcome;
/// nothing is raised past the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
}

impl DeliveryOutcome {
    pub fn sent() -> Self {
        Self {
            status: DeliveryStatus::Sent,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Failed,
            error_message: Some(message.into()),
        }
    }
}

/// Insert shape for one delivery log append.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub user_id: Uuid,
    pub signal_id: Uuid,
    pub channel_kind: ChannelKind,
    pub outcome: DeliveryOutcome,
}

/// Database row for the append-only delivery_logs table. Entries are never
/// updated or deleted by the dispatch path, only read for observability.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeliveryLogEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub signal_id: Uuid,
    pub channel_kind: String,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
