use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Organization, Person, TaskSummary};

/// A note with its tagged persons, organizations and tasks.
///
/// `updated_at` is refreshed on any mutation, including tag changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub tasks: Vec<TaskSummary>,
}

/// Note scalar fields only, for recent-note listings under a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note, with optional initial tags.
///
/// Every referenced ID is validated before any row is written; one missing
/// reference fails the whole creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub person_ids: Vec<i64>,
    #[serde(default)]
    pub org_ids: Vec<i64>,
    #[serde(default)]
    pub task_ids: Vec<i64>,
}
