use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::quota_repo;
use crate::models::{QuotaRecord, DEFAULT_DAILY_SIGNAL_LIMIT};

/// Reference timezone for the daily quota reset: US-Eastern standard time.
/// A fixed offset (DST deliberately ignored) keeps the reset cadence
/// identical all year, so an admission check and its matching increment can
/// never straddle a shifting boundary.
const EASTERN_STANDARD_OFFSET_SECS: i32 = -5 * 3600;

/// Day key for a quota record, computed in the fixed reference timezone so
/// all strategies of a user share one reset cadence.
pub fn quota_day(now: DateTime<Utc>) -> NaiveDate {
    let offset =
        FixedOffset::east_opt(EASTERN_STANDARD_OFFSET_SECS).expect("static offset is in range");
    now.with_timezone(&offset).date_naive()
}

/// Admission control and counting for per-strategy daily notification quotas.
///
/// `increment` is the single point of truth; `check_admission` is an advisory
/// pre-check, and the two are deliberately not one transaction. Under extreme
/// concurrency a near-simultaneous pair of dispatches can both pass the
/// check; the increment itself never loses an update.
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// True iff fewer than `limit` notifications have been counted for the
    /// strategy-day. An absent record counts as zero and is not persisted by
    /// a check-only call.
    async fn check_admission(
        &self,
        strategy_id: Uuid,
        day: NaiveDate,
        limit: i32,
    ) -> anyhow::Result<bool>;

    /// Atomically create-or-increment the strategy-day record by exactly 1
    /// and return the post-increment state.
    async fn increment(
        &self,
        strategy_id: Uuid,
        day: NaiveDate,
        limit: i32,
    ) -> anyhow::Result<QuotaRecord>;

    /// Read-only usage snapshot; never mutates.
    async fn usage(&self, strategy_id: Uuid, day: NaiveDate) -> anyhow::Result<QuotaRecord>;

    /// Delete records strictly older than `retain_since`. Returns the number
    /// of rows removed. Idempotent; safe alongside increments on other keys.
    async fn sweep(&self, retain_since: NaiveDate) -> anyhow::Result<u64>;
}

/// Postgres-backed ledger. Durable across restarts and shared by all server
/// instances; increments serialize on the row via an atomic upsert.
#[derive(Clone)]
pub struct PgQuotaLedger {
    pool: PgPool,
}

impl PgQuotaLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaLedger for PgQuotaLedger {
    async fn check_admission(
        &self,
        strategy_id: Uuid,
        day: NaiveDate,
        limit: i32,
    ) -> anyhow::Result<bool> {
        let record = quota_repo::get_record(&self.pool, strategy_id, day).await?;
        Ok(match record {
            Some(r) => r.notification_count < limit,
            None => true,
        })
    }

    async fn increment(
        &self,
        strategy_id: Uuid,
        day: NaiveDate,
        limit: i32,
    ) -> anyhow::Result<QuotaRecord> {
        quota_repo::increment(&self.pool, strategy_id, day, limit).await
    }

    async fn usage(&self, strategy_id: Uuid, day: NaiveDate) -> anyhow::Result<QuotaRecord> {
        let record = quota_repo::get_record(&self.pool, strategy_id, day).await?;
        Ok(record
            .unwrap_or_else(|| QuotaRecord::zero(strategy_id, day, DEFAULT_DAILY_SIGNAL_LIMIT)))
    }

    async fn sweep(&self, retain_since: NaiveDate) -> anyhow::Result<u64> {
        quota_repo::delete_older_than(&self.pool, retain_since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quota_day_is_previous_date_before_eastern_midnight() {
        // 04:59 UTC is 23:59 the previous day in UTC-5.
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 4, 59, 0).unwrap();
        assert_eq!(
            quota_day(now),
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
    }

    #[test]
    fn test_quota_day_rolls_over_at_eastern_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 5, 0, 0).unwrap();
        assert_eq!(
            quota_day(now),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn test_quota_day_ignores_dst() {
        // Mid-summer: wall-clock Eastern would be UTC-4, the day key stays on
        // the fixed UTC-5 offset so the reset cadence never shifts.
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 4, 30, 0).unwrap();
        assert_eq!(
            quota_day(now),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
    }
}
