// Task record model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task-list entry.
///
/// The id is the sole equality key for lookups and reordering; it and
/// `created_at` never change after creation. List position carries the
/// ordering, so there is no sort key here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: i64,
}

impl Task {
    /// Build a fresh record: new v7 id, not completed, stamped now.
    ///
    /// Callers are expected to trim and reject empty text before this point.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.into(),
            completed: false,
            created_at: now_ms(),
        }
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}
