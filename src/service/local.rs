use async_trait::async_trait;

use super::Backend;
use crate::db::Database;
use crate::error::Result;
use crate::models::*;

/// Backend executing every operation against the local SQLite store.
pub struct LocalBackend {
    db: Database,
}

impl LocalBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn add_person(&self, input: CreatePersonInput) -> Result<Person> {
        self.db.create_person(input)
    }

    async fn list_persons(&self) -> Result<Vec<Person>> {
        self.db.list_persons()
    }

    async fn top_persons(&self, limit: u32) -> Result<Vec<PersonWithNoteCount>> {
        self.db.top_persons(limit)
    }

    async fn search_persons(&self, query: &str) -> Result<Vec<Person>> {
        self.db.search_persons(query)
    }

    async fn bulk_add_persons(&self, names: &[String]) -> Result<BulkAddOutcome> {
        self.db.bulk_add_persons(names)
    }

    async fn person_with_notes(
        &self,
        id: i64,
        note_limit: u32,
    ) -> Result<Option<(Person, Vec<NoteSummary>)>> {
        self.db.person_with_notes(id, note_limit)
    }

    async fn add_organization(&self, input: CreateOrganizationInput) -> Result<Organization> {
        self.db.create_organization(input)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.db.list_organizations()
    }

    async fn top_organizations(&self, limit: u32) -> Result<Vec<OrganizationWithNoteCount>> {
        self.db.top_organizations(limit)
    }

    async fn add_note(&self, input: CreateNoteInput) -> Result<Note> {
        self.db.create_note(input)
    }

    async fn list_notes(
        &self,
        limit: u32,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Note>> {
        self.db.list_notes(limit, person_id, org_id)
    }

    async fn get_note(&self, id: i64) -> Result<Option<Note>> {
        self.db.get_note(id)
    }

    async fn tag_note(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        self.db.tag_note(id, update)
    }

    async fn add_task(&self, input: CreateTaskInput) -> Result<Task> {
        self.db.create_task(input)
    }

    async fn list_tasks(
        &self,
        limit: u32,
        include_completed: bool,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Task>> {
        self.db.list_tasks(limit, include_completed, person_id, org_id)
    }

    async fn urgent_tasks(&self, days: i64, sort: UrgentSort) -> Result<Vec<Task>> {
        self.db.urgent_tasks(days, sort)
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.db.get_task(id)
    }

    async fn complete_task(&self, id: i64) -> Result<Task> {
        self.db.complete_task(id)
    }

    async fn uncomplete_task(&self, id: i64) -> Result<Task> {
        self.db.uncomplete_task(id)
    }

    async fn tag_task(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        self.db.tag_task(id, update)
    }
}
