use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::db::Database;
use crate::error::ServiceError;
use crate::models::*;

// ============================================================
// Error handling
// ============================================================

/// An error response: a status code plus a single human-readable `detail`
/// string, the only error body shape this API produces.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            // Missing mutation targets and filter entities are caller
            // mistakes; only the by-ID fetch routes answer 404 (see the
            // ok_or sites below).
            ServiceError::Duplicate { .. }
            | ServiceError::NotFound(_)
            | ServiceError::ReferenceNotFound(_)
            | ServiceError::Validation(_) => Self::bad_request(e.to_string()),
            ServiceError::Unavailable(msg) => {
                tracing::warn!("Upstream unavailable: {}", msg);
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    detail: msg,
                }
            }
            ServiceError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: "Internal server error".to_string(),
                }
            }
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Contacts
// ============================================================

pub async fn create_contact(
    State(db): State<Database>,
    Json(input): Json<CreatePersonInput>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let person = db.create_person(input)?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn list_contacts(
    State(db): State<Database>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(db.list_persons()?))
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<u32>,
}

pub async fn top_contacts(
    State(db): State<Database>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<PersonWithNoteCount>>, ApiError> {
    Ok(Json(db.top_persons(query.limit.unwrap_or(10))?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

pub async fn search_contacts(
    State(db): State<Database>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(db.search_persons(&query.query)?))
}

pub async fn bulk_add_contacts(
    State(db): State<Database>,
    Json(names): Json<Vec<String>>,
) -> Result<Json<BulkAddOutcome>, ApiError> {
    Ok(Json(db.bulk_add_persons(&names)?))
}

// ============================================================
// Organizations
// ============================================================

pub async fn create_organization(
    State(db): State<Database>,
    Json(input): Json<CreateOrganizationInput>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let organization = db.create_organization(input)?;
    Ok((StatusCode::CREATED, Json(organization)))
}

pub async fn list_organizations(
    State(db): State<Database>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    Ok(Json(db.list_organizations()?))
}

pub async fn top_organizations(
    State(db): State<Database>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<OrganizationWithNoteCount>>, ApiError> {
    Ok(Json(db.top_organizations(query.limit.unwrap_or(10))?))
}

// ============================================================
// Tasks
// ============================================================

pub async fn create_task(
    State(db): State<Database>,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = db.create_task(input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub limit: Option<u32>,
    pub show_completed: Option<bool>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
}

pub async fn list_tasks(
    State(db): State<Database>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = db.list_tasks(
        query.limit.unwrap_or(20),
        query.show_completed.unwrap_or(false),
        query.person_id,
        query.org_id,
    )?;
    Ok(Json(tasks))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentTasksQuery {
    pub days: Option<i64>,
    pub sort_by: Option<String>,
}

pub async fn urgent_tasks(
    State(db): State<Database>,
    Query(query): Query<UrgentTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let sort = match query.sort_by.as_deref() {
        None => UrgentSort::Urgency,
        Some(s) => UrgentSort::from_str(s)
            .ok_or_else(|| ApiError::bad_request("sortBy must be 'urgency' or 'importance'"))?,
    };
    Ok(Json(db.urgent_tasks(query.days.unwrap_or(7), sort)?))
}

pub async fn get_task(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    db.get_task(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Task {id} not found")))
}

pub async fn complete_task(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(db.complete_task(id)?))
}

pub async fn uncomplete_task(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(db.uncomplete_task(id)?))
}

pub async fn update_task_tags(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(update): Json<TagUpdate>,
) -> Result<Json<TagDiff>, ApiError> {
    Ok(Json(db.tag_task(id, &update)?))
}

// ============================================================
// Notes
// ============================================================

pub async fn create_note(
    State(db): State<Database>,
    Json(input): Json<CreateNoteInput>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = db.create_note(input)?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    pub limit: Option<u32>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
}

pub async fn list_notes(
    State(db): State<Database>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = db.list_notes(query.limit.unwrap_or(20), query.person_id, query.org_id)?;
    Ok(Json(notes))
}

pub async fn get_note(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    db.get_note(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Note {id} not found")))
}

pub async fn update_note_tags(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(update): Json<TagUpdate>,
) -> Result<Json<TagDiff>, ApiError> {
    Ok(Json(db.tag_note(id, &update)?))
}
