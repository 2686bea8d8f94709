use async_trait::async_trait;

use super::Backend;
use crate::client::PeerClient;
use crate::error::{Result, ServiceError};
use crate::models::*;

/// Backend forwarding every operation to a remote peer over HTTP.
pub struct RemoteBackend {
    client: PeerClient,
}

impl RemoteBackend {
    pub fn new(client: PeerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn add_person(&self, input: CreatePersonInput) -> Result<Person> {
        self.client.add_person(&input).await
    }

    async fn list_persons(&self) -> Result<Vec<Person>> {
        self.client.list_persons().await
    }

    async fn top_persons(&self, limit: u32) -> Result<Vec<PersonWithNoteCount>> {
        self.client.top_persons(limit).await
    }

    async fn search_persons(&self, query: &str) -> Result<Vec<Person>> {
        self.client.search_persons(query).await
    }

    async fn bulk_add_persons(&self, names: &[String]) -> Result<BulkAddOutcome> {
        self.client.bulk_add_persons(names).await
    }

    async fn person_with_notes(
        &self,
        _id: i64,
        _note_limit: u32,
    ) -> Result<Option<(Person, Vec<NoteSummary>)>> {
        // No remote endpoint serves this composite read. Degrading loudly
        // beats emulating it with a slower multi-call sequence.
        Err(ServiceError::Unavailable(
            "contact detail with recent notes requires a local database".to_string(),
        ))
    }

    async fn add_organization(&self, input: CreateOrganizationInput) -> Result<Organization> {
        self.client.add_organization(&input).await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.client.list_organizations().await
    }

    async fn top_organizations(&self, limit: u32) -> Result<Vec<OrganizationWithNoteCount>> {
        self.client.top_organizations(limit).await
    }

    async fn add_note(&self, input: CreateNoteInput) -> Result<Note> {
        self.client.add_note(&input).await
    }

    async fn list_notes(
        &self,
        limit: u32,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Note>> {
        self.client.list_notes(limit, person_id, org_id).await
    }

    async fn get_note(&self, id: i64) -> Result<Option<Note>> {
        self.client.get_note(id).await
    }

    async fn tag_note(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        self.client.tag_note(id, update).await
    }

    async fn add_task(&self, input: CreateTaskInput) -> Result<Task> {
        self.client.add_task(&input).await
    }

    async fn list_tasks(
        &self,
        limit: u32,
        include_completed: bool,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Task>> {
        self.client
            .list_tasks(limit, include_completed, person_id, org_id)
            .await
    }

    async fn urgent_tasks(&self, days: i64, sort: UrgentSort) -> Result<Vec<Task>> {
        self.client.urgent_tasks(days, sort).await
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.client.get_task(id).await
    }

    async fn complete_task(&self, id: i64) -> Result<Task> {
        self.client.complete_task(id).await
    }

    async fn uncomplete_task(&self, id: i64) -> Result<Task> {
        self.client.uncomplete_task(id).await
    }

    async fn tag_task(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        self.client.tag_task(id, update).await
    }
}
