use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub headline: Option<String>,
    pub icon: Option<String>,
    pub members: i64,
    /// Week-over-week member delta used for trending sorts
    pub trending: f64,
    pub updated_at: DateTime<Utc>,
}
