use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

/// Singleton row naming the talk that is live right now.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActiveTalkPointer {
    pub id: i32,
    pub talk_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ActiveTalkPointer {
    /// The active id, with NULL and empty both meaning nothing is live.
    pub fn active_id(&self) -> Option<&str> {
        self.talk_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enquete {
    pub id: String,
    pub title: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
