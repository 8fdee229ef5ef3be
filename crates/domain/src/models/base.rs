//! Identity and timestamps shared by every entity.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current time truncated to microseconds.
///
/// PostgreSQL `TIMESTAMPTZ` keeps microseconds, so truncating here lets both
/// storage backends return exactly the timestamp they were given.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::microseconds(1))
        .unwrap_or(now)
}

/// Fields common to all entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseModel {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BaseModel {
    /// Assigns a fresh id and sets both timestamps to now.
    pub fn new() -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes `updated_at`. Never moves it behind `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = now().max(self.created_at);
    }
}

impl Default for BaseModel {
    fn default() -> Self {
        Self::new()
    }
}
