use std::fmt;

use thiserror::Error;

/// IDs referenced by a tagging request that do not exist, grouped by kind.
///
/// Collected across every kind in the request before any mutation, so a
/// single error names the complete unresolved set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MissingRefs {
    pub persons: Vec<i64>,
    pub organizations: Vec<i64>,
    pub tasks: Vec<i64>,
}

impl MissingRefs {
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.organizations.is_empty() && self.tasks.is_empty()
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for MissingRefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.persons.is_empty() {
            parts.push(format!("Person IDs not found: {}", join_ids(&self.persons)));
        }
        if !self.organizations.is_empty() {
            parts.push(format!(
                "Organization IDs not found: {}",
                join_ids(&self.organizations)
            ));
        }
        if !self.tasks.is_empty() {
            parts.push(format!("Task IDs not found: {}", join_ids(&self.tasks)));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Errors returned by every core operation, on both backends.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Create-time uniqueness violation; carries the existing record's ID.
    #[error("{entity} '{name}' already exists (ID: {id})")]
    Duplicate {
        entity: &'static str,
        name: String,
        id: i64,
    },

    /// The target entity of a mutation or filter is absent.
    #[error("{0}")]
    NotFound(String),

    /// One or more tag-target IDs do not exist; no changes were applied.
    #[error("{0}")]
    ReferenceNotFound(MissingRefs),

    #[error("{0}")]
    Validation(String),

    /// The remote peer could not be reached or answered outside the contract.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} ID {id} not found"))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_refs_display_groups_by_kind() {
        let refs = MissingRefs {
            persons: vec![3, 7],
            organizations: vec![],
            tasks: vec![99999],
        };
        assert_eq!(
            refs.to_string(),
            "Person IDs not found: 3, 7; Task IDs not found: 99999"
        );
    }
}
