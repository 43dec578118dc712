use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Denormalized catalogue row for one game. The database owns this shape;
/// the app only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    /// Final price in cents, lowest listed currency
    pub price_final: i32,
    pub players_peak_week: i64,
    pub followers: i64,
    pub review_score: f64,
    pub primary_genre: Option<String>,
    pub updated_at: DateTime<Utc>,
}
