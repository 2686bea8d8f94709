//! HTTP client for a remote rolodex peer.
//!
//! Each repository operation maps to one round trip against the API in
//! [`crate::api`]. Responses decode into the same model types used locally;
//! RFC 3339 timestamps parse back into `DateTime<Utc>` through serde.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Result, ServiceError};
use crate::models::*;

/// Bounded wait per network call; exceeding it is a backend failure, not a
/// retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::Unavailable(format!("request failed: {e}"))
    }
}

#[derive(Debug, Clone)]
pub struct PeerClient {
    base_url: String,
    client: Client,
}

impl PeerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a response, mapping error statuses onto the service taxonomy.
    /// Error bodies carry `{"detail": "..."}`; the detail text is surfaced
    /// verbatim so both backends report the same message.
    async fn handle<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ServiceError::Unavailable(format!("invalid response body: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or(body);

        Err(match status {
            StatusCode::NOT_FOUND => ServiceError::NotFound(detail),
            StatusCode::BAD_REQUEST => ServiceError::Validation(detail),
            _ => ServiceError::Unavailable(format!("{status}: {detail}")),
        })
    }

    // ============================================================
    // Contact operations
    // ============================================================

    pub async fn add_person(&self, input: &CreatePersonInput) -> Result<Person> {
        let response = self
            .client
            .post(self.url("/contacts"))
            .json(input)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn list_persons(&self) -> Result<Vec<Person>> {
        let response = self.client.get(self.url("/contacts")).send().await?;
        self.handle(response).await
    }

    pub async fn top_persons(&self, limit: u32) -> Result<Vec<PersonWithNoteCount>> {
        let response = self
            .client
            .get(self.url("/contacts/top"))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn search_persons(&self, query: &str) -> Result<Vec<Person>> {
        let response = self
            .client
            .get(self.url("/contacts/search"))
            .query(&[("query", query)])
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn bulk_add_persons(&self, names: &[String]) -> Result<BulkAddOutcome> {
        let response = self
            .client
            .post(self.url("/contacts/bulk"))
            .json(names)
            .send()
            .await?;
        self.handle(response).await
    }

    // ============================================================
    // Organization operations
    // ============================================================

    pub async fn add_organization(&self, input: &CreateOrganizationInput) -> Result<Organization> {
        let response = self
            .client
            .post(self.url("/organizations"))
            .json(input)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let response = self.client.get(self.url("/organizations")).send().await?;
        self.handle(response).await
    }

    pub async fn top_organizations(&self, limit: u32) -> Result<Vec<OrganizationWithNoteCount>> {
        let response = self
            .client
            .get(self.url("/organizations/top"))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        self.handle(response).await
    }

    // ============================================================
    // Note operations
    // ============================================================

    pub async fn add_note(&self, input: &CreateNoteInput) -> Result<Note> {
        let response = self
            .client
            .post(self.url("/notes"))
            .json(input)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn list_notes(
        &self,
        limit: u32,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Note>> {
        let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(pid) = person_id {
            query.push(("personId", pid.to_string()));
        }
        if let Some(oid) = org_id {
            query.push(("orgId", oid.to_string()));
        }
        let response = self
            .client
            .get(self.url("/notes"))
            .query(&query)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let response = self
            .client
            .get(self.url(&format!("/notes/{id}")))
            .send()
            .await?;
        match self.handle(response).await {
            Ok(note) => Ok(Some(note)),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn tag_note(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        let response = self
            .client
            .patch(self.url(&format!("/notes/{id}/tags")))
            .json(update)
            .send()
            .await?;
        self.handle(response).await
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub async fn add_task(&self, input: &CreateTaskInput) -> Result<Task> {
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(input)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn list_tasks(
        &self,
        limit: u32,
        include_completed: bool,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Task>> {
        let mut query: Vec<(&str, String)> = vec![
            ("limit", limit.to_string()),
            ("showCompleted", include_completed.to_string()),
        ];
        if let Some(pid) = person_id {
            query.push(("personId", pid.to_string()));
        }
        if let Some(oid) = org_id {
            query.push(("orgId", oid.to_string()));
        }
        let response = self
            .client
            .get(self.url("/tasks"))
            .query(&query)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn urgent_tasks(&self, days: i64, sort: UrgentSort) -> Result<Vec<Task>> {
        let response = self
            .client
            .get(self.url("/tasks/urgent"))
            .query(&[("days", days.to_string()), ("sortBy", sort.as_str().into())])
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let response = self
            .client
            .get(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        match self.handle(response).await {
            Ok(task) => Ok(Some(task)),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn complete_task(&self, id: i64) -> Result<Task> {
        let response = self
            .client
            .post(self.url(&format!("/tasks/{id}/complete")))
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn uncomplete_task(&self, id: i64) -> Result<Task> {
        let response = self
            .client
            .post(self.url(&format!("/tasks/{id}/uncomplete")))
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn tag_task(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        let response = self
            .client
            .patch(self.url(&format!("/tasks/{id}/tags")))
            .json(update)
            .send()
            .await?;
        self.handle(response).await
    }
}
