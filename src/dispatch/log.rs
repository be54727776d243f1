use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::delivery_log_repo;
use crate::models::{DeliveryAttempt, DeliveryLogEntry};

/// Append-only audit log of delivery attempts. Observability, not control:
/// the coordinator retries a failed append a bounded number of times and then
/// drops it, so a logging failure is never surfaced as a notification
/// failure.
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    async fn append(&self, attempt: &DeliveryAttempt) -> anyhow::Result<()>;

    /// Newest-first history for the notification log view.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<DeliveryLogEntry>>;
}

#[derive(Clone)]
pub struct PgDeliveryLog {
    pool: PgPool,
}

impl PgDeliveryLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryLog for PgDeliveryLog {
    async fn append(&self, attempt: &DeliveryAttempt) -> anyhow::Result<()> {
        delivery_log_repo::append(
            &self.pool,
            attempt.user_id,
            attempt.signal_id,
            attempt.channel_kind.as_str(),
            attempt.outcome.status.as_str(),
            attempt.outcome.error_message.as_deref(),
        )
        .await
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<DeliveryLogEntry>> {
        delivery_log_repo::list_by_user(&self.pool, user_id, limit).await
    }
}
