use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task as stored in the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task that has not been persisted yet. The id is assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Task {
    /// Overwrites the editable fields. `completed` is left alone.
    pub fn apply_update(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.title = title.into();
        self.description = description;
        self.touch(now);
    }

    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.touch(now);
    }

    /// Refreshes `updated_at`, keeping it strictly increasing even if the clock
    /// has not moved since the last write.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::milliseconds(1)
        };
    }
}
