use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::QuotaRecord;

/// Fetch the quota record for a strategy-day, if one exists.
/// Check-only reads never create the row.
pub async fn get_record(
    pool: &PgPool,
    strategy_id: Uuid,
    day: NaiveDate,
) -> anyhow::Result<Option<QuotaRecord>> {
    let record = sqlx::query_as::<_, QuotaRecord>(
        "SELECT * FROM quota_records WHERE strategy_id = $1 AND signal_date = $2",
    )
    .bind(strategy_id)
    .bind(day)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Atomically create-or-increment the record for a strategy-day by exactly 1
/// and return the post-increment state. The row-level upsert serializes
/// concurrent callers on the same key, so counts are never lost.
pub async fn increment(
    pool: &PgPool,
    strategy_id: Uuid,
    day: NaiveDate,
    daily_limit: i32,
) -> anyhow::Result<QuotaRecord> {
    let record = sqlx::query_as::<_, QuotaRecord>(
        r#"
        INSERT INTO quota_records (strategy_id, signal_date, notification_count, daily_limit)
        VALUES ($1, $2, 1, $3)
        ON CONFLICT (strategy_id, signal_date) DO UPDATE
            SET notification_count = quota_records.notification_count + 1,
                daily_limit = EXCLUDED.daily_limit,
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(strategy_id)
    .bind(day)
    .bind(daily_limit)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Delete quota records strictly older than the retention cutoff.
/// Idempotent; touches no row for the current day.
pub async fn delete_older_than(pool: &PgPool, retain_since: NaiveDate) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM quota_records WHERE signal_date < $1")
        .bind(retain_since)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
