use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the quota_records table, keyed (strategy_id, signal_date).
/// The count only increases within a day; a new day starts a fresh row at 0.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuotaRecord {
    pub strategy_id: Uuid,
    pub signal_date: NaiveDate,
    pub notification_count: i32,
    pub daily_limit: i32,
}

impl QuotaRecord {
    /// Implicit zero record for a (strategy, day) with no persisted row yet.
    pub fn zero(strategy_id: Uuid, signal_date: NaiveDate, daily_limit: i32) -> Self {
        Self {
            strategy_id,
            signal_date,
            notification_count: 0,
            daily_limit,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.notification_count >= self.daily_limit
    }

    pub fn usage(&self) -> QuotaUsage {
        QuotaUsage {
            count: self.notification_count,
            limit: self.daily_limit,
            remaining: (self.daily_limit - self.notification_count).max(0),
            is_limit_reached: self.is_exhausted(),
        }
    }
}

/// Snapshot shape consumed by the dashboard quota widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaUsage {
    pub count: i32,
    pub limit: i32,
    pub remaining: i32,
    pub is_limit_reached: bool,
}
