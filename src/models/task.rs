use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Organization, Person};

/// A task with a due time and an importance score on a 0-10 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub importance: i32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

/// Task scalar fields only, used where tasks nest inside notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub importance: i32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task, with optional initial person/org tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub importance: i32,
    #[serde(default)]
    pub person_ids: Vec<i64>,
    #[serde(default)]
    pub org_ids: Vec<i64>,
}

/// Sort order for the urgent-task listing.
///
/// - `Urgency`: due time ascending
/// - `Importance`: importance descending, then due time ascending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UrgentSort {
    Urgency,
    Importance,
}

impl UrgentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::Importance => "importance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "urgency" => Some(Self::Urgency),
            "importance" => Some(Self::Importance),
            _ => None,
        }
    }
}
