//! The dual-backend dispatcher.
//!
//! Every repository and reconciliation operation is a method on [`Backend`],
//! with two implementations: [`LocalBackend`] over the SQLite store and
//! [`RemoteBackend`] over a configured peer. The choice is made once, in
//! [`backend_from_config`], and callers never branch on it afterwards.

mod local;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

use crate::client::PeerClient;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::models::*;

#[async_trait]
pub trait Backend: Send + Sync {
    // Contacts
    async fn add_person(&self, input: CreatePersonInput) -> Result<Person>;
    async fn list_persons(&self) -> Result<Vec<Person>>;
    async fn top_persons(&self, limit: u32) -> Result<Vec<PersonWithNoteCount>>;
    async fn search_persons(&self, query: &str) -> Result<Vec<Person>>;
    async fn bulk_add_persons(&self, names: &[String]) -> Result<BulkAddOutcome>;
    /// A person plus their most recent notes. Not available remotely; the
    /// remote backend reports `Unavailable` rather than emulating the join
    /// with extra round trips.
    async fn person_with_notes(
        &self,
        id: i64,
        note_limit: u32,
    ) -> Result<Option<(Person, Vec<NoteSummary>)>>;

    // Organizations
    async fn add_organization(&self, input: CreateOrganizationInput) -> Result<Organization>;
    async fn list_organizations(&self) -> Result<Vec<Organization>>;
    async fn top_organizations(&self, limit: u32) -> Result<Vec<OrganizationWithNoteCount>>;

    // Notes
    async fn add_note(&self, input: CreateNoteInput) -> Result<Note>;
    async fn list_notes(
        &self,
        limit: u32,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Note>>;
    async fn get_note(&self, id: i64) -> Result<Option<Note>>;
    async fn tag_note(&self, id: i64, update: &TagUpdate) -> Result<TagDiff>;

    // Tasks
    async fn add_task(&self, input: CreateTaskInput) -> Result<Task>;
    async fn list_tasks(
        &self,
        limit: u32,
        include_completed: bool,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Task>>;
    async fn urgent_tasks(&self, days: i64, sort: UrgentSort) -> Result<Vec<Task>>;
    async fn get_task(&self, id: i64) -> Result<Option<Task>>;
    async fn complete_task(&self, id: i64) -> Result<Task>;
    async fn uncomplete_task(&self, id: i64) -> Result<Task>;
    async fn tag_task(&self, id: i64, update: &TagUpdate) -> Result<TagDiff>;
}

/// Select the backend from configuration: a remote URL means every call is
/// forwarded to that peer, otherwise the local store is opened and migrated.
pub fn backend_from_config(config: &Config) -> anyhow::Result<Arc<dyn Backend>> {
    match &config.remote_url {
        Some(url) => {
            tracing::debug!("Using remote backend at {}", url);
            let client = PeerClient::new(url.clone())?;
            Ok(Arc::new(RemoteBackend::new(client)))
        }
        None => {
            let db = match &config.db_path {
                Some(path) => Database::open(path.clone())?,
                None => Database::open_default()?,
            };
            db.migrate()?;
            Ok(Arc::new(LocalBackend::new(db)))
        }
    }
}
