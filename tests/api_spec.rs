use axum::http::StatusCode;
use axum_test::TestServer;
use rolodex::api::create_router;
use rolodex::db::Database;
use serde_json::{json, Value};

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_contact(server: &TestServer, first: &str, last: &str) -> Value {
    server
        .post("/contacts")
        .json(&json!({ "firstName": first, "lastName": last }))
        .await
        .json::<Value>()
}

async fn create_task(server: &TestServer, title: &str, importance: i64) -> Value {
    server
        .post("/tasks")
        .json(&json!({
            "title": title,
            "dueAt": "2026-09-01T12:00:00Z",
            "importance": importance,
        }))
        .await
        .json::<Value>()
}

mod contacts {
    use super::*;

    #[tokio::test]
    async fn create_returns_201_with_the_entity() {
        let server = setup();

        let response = server
            .post("/contacts")
            .json(&json!({ "firstName": "Ada", "lastName": "Lovelace" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["lastName"], "Lovelace");
        assert!(body["id"].is_i64());
    }

    #[tokio::test]
    async fn duplicate_create_returns_400_with_detail() {
        let server = setup();
        let first = create_contact(&server, "Ada", "Lovelace").await;

        let response = server
            .post("/contacts")
            .json(&json!({ "firstName": "Ada", "lastName": "Lovelace" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        let detail = body["detail"].as_str().expect("detail string");
        assert!(detail.contains("already exists"));
        assert!(detail.contains(&format!("ID: {}", first["id"])));
    }

    #[tokio::test]
    async fn list_is_ordered_by_last_name() {
        let server = setup();
        create_contact(&server, "Ada", "Lovelace").await;
        create_contact(&server, "Grace", "Hopper").await;

        let response = server.get("/contacts").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body[0]["lastName"], "Hopper");
        assert_eq!(body[1]["lastName"], "Lovelace");
    }

    #[tokio::test]
    async fn search_matches_either_name_field() {
        let server = setup();
        create_contact(&server, "Ada", "Lovelace").await;
        create_contact(&server, "Grace", "Hopper").await;

        let response = server.get("/contacts/search").add_query_param("query", "hopp").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body.as_array().expect("array").len(), 1);
        assert_eq!(body[0]["firstName"], "Grace");
    }

    #[tokio::test]
    async fn top_reports_note_counts() {
        let server = setup();
        let ada = create_contact(&server, "Ada", "Lovelace").await;
        create_contact(&server, "Grace", "Hopper").await;

        server
            .post("/notes")
            .json(&json!({
                "title": "n",
                "content": "c",
                "personIds": [ada["id"]],
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/contacts/top").add_query_param("limit", 1).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body.as_array().expect("array").len(), 1);
        assert_eq!(body[0]["id"], ada["id"]);
        assert_eq!(body[0]["noteCount"], 1);
    }

    #[tokio::test]
    async fn bulk_reports_added_and_skipped() {
        let server = setup();
        create_contact(&server, "Ada", "Lovelace").await;

        let response = server
            .post("/contacts/bulk")
            .json(&json!(["Ada Lovelace", "Grace Hopper"]))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["added"].as_array().expect("added").len(), 1);
        assert_eq!(body["skipped"].as_array().expect("skipped").len(), 1);
    }
}

mod organizations {
    use super::*;

    #[tokio::test]
    async fn duplicate_name_returns_400() {
        let server = setup();
        server
            .post("/organizations")
            .json(&json!({ "name": "Acme" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/organizations")
            .json(&json!({ "name": "Acme" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().expect("detail").contains("Acme"));
    }
}

mod tasks {
    use super::*;

    #[tokio::test]
    async fn importance_out_of_range_returns_400_and_persists_nothing() {
        let server = setup();

        let response = server
            .post("/tasks")
            .json(&json!({
                "title": "Ship v1",
                "dueAt": "2026-09-01T12:00:00Z",
                "importance": 11,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Importance must be between 0 and 10");

        let listed: Value = server
            .get("/tasks")
            .add_query_param("showCompleted", true)
            .await
            .json();
        assert!(listed.as_array().expect("array").is_empty());
    }

    #[tokio::test]
    async fn get_missing_task_returns_404() {
        let server = setup();
        let response = server.get("/tasks/42").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn urgent_rejects_unknown_sort_keys() {
        let server = setup();

        let response = server
            .get("/tasks/urgent")
            .add_query_param("sortBy", "priority")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["detail"], "sortBy must be 'urgency' or 'importance'");
    }

    #[tokio::test]
    async fn complete_twice_returns_400() {
        let server = setup();
        let task = create_task(&server, "water plants", 3).await;
        let id = task["id"].as_i64().expect("id");

        let response = server.post(&format!("/tasks/{id}/complete")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["completed"], true);

        let response = server.post(&format!("/tasks/{id}/complete")).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"]
            .as_str()
            .expect("detail")
            .contains("already completed"));
    }

    #[tokio::test]
    async fn tag_patch_returns_the_diff() {
        let server = setup();
        let ada = create_contact(&server, "Ada", "Lovelace").await;
        let task = create_task(&server, "call ada", 5).await;
        let id = task["id"].as_i64().expect("id");

        let response = server
            .patch(&format!("/tasks/{id}/tags"))
            .json(&json!({ "addPersonIds": [ada["id"]] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["addedPersons"], json!(["Ada Lovelace"]));

        // Repeating the same add changes nothing: the diff comes back empty.
        let response = server
            .patch(&format!("/tasks/{id}/tags"))
            .json(&json!({ "addPersonIds": [ada["id"]] }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn tag_with_missing_reference_returns_400_listing_ids() {
        let server = setup();
        let task = create_task(&server, "call", 5).await;
        let id = task["id"].as_i64().expect("id");

        let response = server
            .patch(&format!("/tasks/{id}/tags"))
            .json(&json!({ "addPersonIds": [99999] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().expect("detail").contains("99999"));
    }
}

mod notes {
    use super::*;

    #[tokio::test]
    async fn create_with_missing_reference_returns_400_and_persists_nothing() {
        let server = setup();
        let ada = create_contact(&server, "Ada", "Lovelace").await;

        let response = server
            .post("/notes")
            .json(&json!({
                "title": "n",
                "content": "c",
                "personIds": [ada["id"], 99999],
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().expect("detail").contains("99999"));

        let listed: Value = server.get("/notes").await.json();
        assert!(listed.as_array().expect("array").is_empty());
    }

    #[tokio::test]
    async fn create_returns_nested_tag_collections() {
        let server = setup();
        let ada = create_contact(&server, "Ada", "Lovelace").await;

        let response = server
            .post("/notes")
            .json(&json!({
                "title": "kickoff",
                "content": "everyone was there",
                "personIds": [ada["id"]],
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["persons"][0]["firstName"], "Ada");
        assert_eq!(body["organizations"], json!([]));
        assert_eq!(body["tasks"], json!([]));
    }

    #[tokio::test]
    async fn get_missing_note_returns_404_with_detail() {
        let server = setup();
        let response = server.get("/notes/7").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Note 7 not found");
    }

    #[tokio::test]
    async fn list_filter_by_missing_person_returns_400() {
        let server = setup();

        let response = server.get("/notes").add_query_param("personId", 12345).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"]
            .as_str()
            .expect("detail")
            .contains("12345"));
    }

    #[tokio::test]
    async fn note_tag_lifecycle_reports_adds_then_removes() {
        let server = setup();
        let ada = create_contact(&server, "Ada", "Lovelace").await;
        let note: Value = server
            .post("/notes")
            .json(&json!({ "title": "n", "content": "c" }))
            .await
            .json();
        let id = note["id"].as_i64().expect("id");

        let response = server
            .patch(&format!("/notes/{id}/tags"))
            .json(&json!({ "addPersonIds": [ada["id"]] }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["addedPersons"], json!(["Ada Lovelace"]));

        let response = server
            .patch(&format!("/notes/{id}/tags"))
            .json(&json!({ "removePersonIds": [ada["id"]] }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["removedPersons"], json!(["Ada Lovelace"]));

        let fetched: Value = server.get(&format!("/notes/{id}")).await.json();
        assert_eq!(fetched["persons"], json!([]));
    }
}
