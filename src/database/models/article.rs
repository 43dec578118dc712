use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub app_id: i64,
    pub published_at: DateTime<Utc>,
}
