use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::session::UserLevel;

/// Account record looked up by API key
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiUser {
    pub id: Uuid,
    pub email: String,
    pub api_key: String,
    pub level: i64,
    pub created_at: DateTime<Utc>,
}

impl ApiUser {
    pub fn user_level(&self) -> UserLevel {
        UserLevel::from_i64(self.level)
    }
}
