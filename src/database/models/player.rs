use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    /// 64-bit community id
    pub id: i64,
    pub persona_name: String,
    pub avatar: Option<String>,
    pub country_code: Option<String>,
    pub level: i32,
    pub games_count: i32,
    pub badges_count: i32,
    pub friends_count: i32,
    pub updated_at: DateTime<Utc>,
}
