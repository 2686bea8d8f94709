use serde::{Deserialize, Serialize};

/// Add/remove instructions for one entity's association sets.
///
/// Kinds the target entity does not support are ignored: task reconciliation
/// reads only the person and organization lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    #[serde(default)]
    pub add_person_ids: Vec<i64>,
    #[serde(default)]
    pub remove_person_ids: Vec<i64>,
    #[serde(default)]
    pub add_org_ids: Vec<i64>,
    #[serde(default)]
    pub remove_org_ids: Vec<i64>,
    #[serde(default)]
    pub add_task_ids: Vec<i64>,
    #[serde(default)]
    pub remove_task_ids: Vec<i64>,
}

/// What a reconciliation call actually changed, by display name.
///
/// Entries already present (adds) or already absent (removes) are skipped
/// silently and never appear here. Empty lists are omitted on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagDiff {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_persons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_persons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_organizations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_organizations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_tasks: Vec<String>,
}

impl TagDiff {
    /// True when the call changed nothing; callers report "no changes made".
    pub fn is_empty(&self) -> bool {
        self.added_persons.is_empty()
            && self.removed_persons.is_empty()
            && self.added_organizations.is_empty()
            && self.removed_organizations.is_empty()
            && self.added_tasks.is_empty()
            && self.removed_tasks.is_empty()
    }
}
