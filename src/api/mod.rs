mod handlers;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        // Contacts
        .route("/contacts", post(handlers::create_contact))
        .route("/contacts", get(handlers::list_contacts))
        .route("/contacts/top", get(handlers::top_contacts))
        .route("/contacts/search", get(handlers::search_contacts))
        .route("/contacts/bulk", post(handlers::bulk_add_contacts))
        // Organizations
        .route("/organizations", post(handlers::create_organization))
        .route("/organizations", get(handlers::list_organizations))
        .route("/organizations/top", get(handlers::top_organizations))
        // Tasks
        .route("/tasks", post(handlers::create_task))
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks/urgent", get(handlers::urgent_tasks))
        .route("/tasks/{id}", get(handlers::get_task))
        .route("/tasks/{id}/complete", post(handlers::complete_task))
        .route("/tasks/{id}/uncomplete", post(handlers::uncomplete_task))
        .route("/tasks/{id}/tags", patch(handlers::update_task_tags))
        // Notes
        .route("/notes", post(handlers::create_note))
        .route("/notes", get(handlers::list_notes))
        .route("/notes/{id}", get(handlers::get_note))
        .route("/notes/{id}/tags", patch(handlers::update_note_tags))
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
