use sqlx::PgPool;
use uuid::Uuid;

use crate::models::DeliveryLogEntry;

/// Append one delivery attempt. The unique (signal_id, channel_kind) index
/// turns a retried append into a no-op instead of a duplicate history row.
pub async fn append(
    pool: &PgPool,
    user_id: Uuid,
    signal_id: Uuid,
    channel_kind: &str,
    status: &str,
    error_message: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO delivery_logs (user_id, signal_id, channel_kind, status, error_message)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (signal_id, channel_kind) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(signal_id)
    .bind(channel_kind)
    .bind(status)
    .bind(error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Newest-first delivery history for a user.
pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<DeliveryLogEntry>> {
    let entries = sqlx::query_as::<_, DeliveryLogEntry>(
        "SELECT * FROM delivery_logs WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
