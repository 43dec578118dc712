use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A pending refresh request for one catalogue entity, drained by the
/// external updater
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UpdateRequest {
    pub id: Uuid,
    pub kind: String,
    pub entity_id: String,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
