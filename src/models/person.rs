use serde::{Deserialize, Serialize};

/// A person in the address book.
///
/// The (first, last) name pair is unique, enforced by the service layer
/// before insert rather than by a storage constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    /// Display name used in tag diffs and listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonInput {
    pub first_name: String,
    pub last_name: String,
}

/// A person together with how many notes reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonWithNoteCount {
    #[serde(flatten)]
    pub person: Person,
    pub note_count: i64,
}

/// Outcome of a bulk add: human-readable descriptions carrying the IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAddOutcome {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}
