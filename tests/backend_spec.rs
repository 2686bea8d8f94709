//! Dispatcher contract: the same call sequence against the local backend and
//! against a remote peer running the same core must behave identically.

use std::sync::Arc;

use rolodex::api::create_router;
use rolodex::client::PeerClient;
use rolodex::db::Database;
use rolodex::error::ServiceError;
use rolodex::models::*;
use rolodex::service::{Backend, LocalBackend, RemoteBackend};

fn local_backend() -> Arc<dyn Backend> {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    Arc::new(LocalBackend::new(db))
}

/// Serve the API from an in-memory database on an ephemeral port and return
/// a remote backend pointed at it.
async fn remote_backend() -> Arc<dyn Backend> {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = PeerClient::new(format!("http://{addr}")).expect("Failed to build client");
    Arc::new(RemoteBackend::new(client))
}

async fn seed_person(backend: &dyn Backend, first: &str, last: &str) -> Person {
    backend
        .add_person(CreatePersonInput {
            first_name: first.to_string(),
            last_name: last.to_string(),
        })
        .await
        .expect("Failed to add person")
}

#[tokio::test]
async fn create_and_list_agree_across_backends() {
    let local = local_backend();
    let remote = remote_backend().await;

    for backend in [local.as_ref(), remote.as_ref()] {
        seed_person(backend, "Ada", "Lovelace").await;
        seed_person(backend, "Grace", "Hopper").await;
    }

    let local_list = local.list_persons().await.expect("local list");
    let remote_list = remote.list_persons().await.expect("remote list");
    assert_eq!(local_list, remote_list);
}

#[tokio::test]
async fn duplicate_errors_carry_the_same_detail_on_both_backends() {
    let local = local_backend();
    let remote = remote_backend().await;

    let mut messages = Vec::new();
    for backend in [local.as_ref(), remote.as_ref()] {
        seed_person(backend, "Ada", "Lovelace").await;
        let err = backend
            .add_person(CreatePersonInput {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            })
            .await
            .expect_err("duplicate must fail");
        messages.push(err.to_string());
    }

    assert_eq!(messages[0], messages[1]);
    assert!(messages[0].contains("already exists"));
}

#[tokio::test]
async fn tag_diffs_agree_across_backends() {
    let local = local_backend();
    let remote = remote_backend().await;

    let mut diffs = Vec::new();
    for backend in [local.as_ref(), remote.as_ref()] {
        let ada = seed_person(backend, "Ada", "Lovelace").await;
        let note = backend
            .add_note(CreateNoteInput {
                title: "kickoff".to_string(),
                content: "minutes".to_string(),
                ..CreateNoteInput::default()
            })
            .await
            .expect("Failed to add note");

        let diff = backend
            .tag_note(
                note.id,
                &TagUpdate {
                    add_person_ids: vec![ada.id],
                    ..TagUpdate::default()
                },
            )
            .await
            .expect("Failed to tag note");
        diffs.push(diff);
    }

    assert_eq!(diffs[0], diffs[1]);
    assert_eq!(diffs[0].added_persons, vec!["Ada Lovelace"]);
}

#[tokio::test]
async fn timestamps_survive_the_wire_round_trip() {
    let remote = remote_backend().await;

    let created = remote
        .add_note(CreateNoteInput {
            title: "n".to_string(),
            content: "c".to_string(),
            ..CreateNoteInput::default()
        })
        .await
        .expect("Failed to add note");

    let fetched = remote
        .get_note(created.id)
        .await
        .expect("Failed to get note")
        .expect("note exists");
    assert_eq!(fetched.created_at, created.created_at);
    assert_eq!(fetched.updated_at, created.updated_at);
}

#[tokio::test]
async fn missing_fetches_are_none_not_errors_on_both_backends() {
    let local = local_backend();
    let remote = remote_backend().await;

    for backend in [local.as_ref(), remote.as_ref()] {
        assert!(backend.get_note(404).await.expect("get_note").is_none());
        assert!(backend.get_task(404).await.expect("get_task").is_none());
    }
}

#[tokio::test]
async fn remote_person_with_notes_degrades_to_unavailable() {
    let remote = remote_backend().await;
    let ada = seed_person(remote.as_ref(), "Ada", "Lovelace").await;

    let err = remote
        .person_with_notes(ada.id, 5)
        .await
        .expect_err("composite read has no remote endpoint");
    assert!(matches!(err, ServiceError::Unavailable(_)));
}

#[tokio::test]
async fn unreachable_peer_reports_unavailable() {
    // Nothing listens on port 1; the connection fails, it does not hang.
    let client = PeerClient::new("http://127.0.0.1:1").expect("Failed to build client");
    let backend = RemoteBackend::new(client);

    let err = backend
        .list_persons()
        .await
        .expect_err("unreachable peer must fail");
    assert!(matches!(err, ServiceError::Unavailable(_)));
}
