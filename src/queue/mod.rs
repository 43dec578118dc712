use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::UpdateRequest;

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    Queued,
    /// A request for the same entity is already pending inside the cooldown
    /// window; acknowledged but not re-enqueued
    AlreadyPending,
}

#[async_trait]
pub trait QueuePublisher: Send + Sync {
    async fn publish(&self, kind: &str, entity_id: &str) -> Result<Enqueued, StoreError>;
}

/// Update-request funnel backed by the `update_requests` table, drained by
/// the external updater process.
pub struct PostgresQueue {
    pool: PgPool,
    cooldown: Duration,
}

impl PostgresQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cooldown: Duration::minutes(30) }
    }

    pub fn with_cooldown(pool: PgPool, cooldown: Duration) -> Self {
        Self { pool, cooldown }
    }
}

#[async_trait]
impl QueuePublisher for PostgresQueue {
    async fn publish(&self, kind: &str, entity_id: &str) -> Result<Enqueued, StoreError> {
        // Single statement so concurrent requests can't both pass the
        // pending check
        let inserted: Option<UpdateRequest> = sqlx::query_as(
            "INSERT INTO \"update_requests\" (id, kind, entity_id, requested_at) \
             SELECT $1, $2, $3, NOW() \
             WHERE NOT EXISTS (\
                 SELECT 1 FROM \"update_requests\" \
                 WHERE kind = $2 AND entity_id = $3 AND processed_at IS NULL \
                   AND requested_at > NOW() - $4::interval\
             ) \
             RETURNING id, kind, entity_id, requested_at, processed_at",
        )
        .bind(Uuid::new_v4())
        .bind(kind)
        .bind(entity_id)
        .bind(format!("{} seconds", self.cooldown.num_seconds()))
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(request) => {
                tracing::debug!("queued {} update for {}", request.kind, request.entity_id);
                Ok(Enqueued::Queued)
            }
            None => Ok(Enqueued::AlreadyPending),
        }
    }
}
