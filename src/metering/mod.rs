use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::manager::StoreError;

/// One metered API call
#[derive(Debug, Clone)]
pub struct UsageEvent {
    pub path: String,
    pub user_id: Uuid,
    pub status: u16,
    pub recorded_at: DateTime<Utc>,
}

impl UsageEvent {
    pub fn new(path: impl Into<String>, user_id: Uuid, status: u16) -> Self {
        Self {
            path: path.into(),
            user_id,
            status,
            recorded_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, event: UsageEvent) -> Result<(), StoreError>;
}

pub struct PostgresUsageSink {
    pool: PgPool,
}

impl PostgresUsageSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageSink for PostgresUsageSink {
    async fn record(&self, event: UsageEvent) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO \"api_usage\" (path, user_id, status, recorded_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&event.path)
        .bind(event.user_id)
        .bind(event.status as i32)
        .bind(event.recorded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Fire the metering write on a detached task. The response has already been
/// decided; a failed write is logged and otherwise ignored.
pub fn record_detached(sink: Arc<dyn UsageSink>, event: UsageEvent) {
    tokio::spawn(async move {
        if let Err(e) = sink.record(event.clone()).await {
            tracing::warn!("usage metering write failed for {}: {}", event.path, e);
        }
    });
}
