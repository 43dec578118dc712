use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub billing_type: String,
    pub license_type: String,
    pub apps_count: i32,
    pub price_final: i32,
    pub updated_at: DateTime<Utc>,
}
