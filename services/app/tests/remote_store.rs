//! End-to-end checks of the store over real HTTP against a mock study service,
//! with the session kept in a temporary local-storage file.

use std::sync::Arc;

use app_lib::adapters::{JsonFileStorage, ReqwestTransport};
use serde_json::json;
use study_aid_core::{
    domain::{QuizHistoryEntry, SessionState, Summary},
    ports::{KeyValueStore, PortError},
    store::ClientSessionStore,
};
use tempfile::TempDir;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn store_for(server: &MockServer, dir: &TempDir) -> ClientSessionStore {
    let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new(), server.uri()));
    let storage = Arc::new(JsonFileStorage::open(dir.path().join("local_storage.json")));
    ClientSessionStore::new(transport, storage)
}

#[tokio::test]
async fn server_error_on_list_reads_as_empty() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/summaries"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let store = store_for(&server, &dir);
    assert!(store.list_summaries("anonymous").await.is_empty());
}

#[tokio::test]
async fn unreachable_service_reads_as_empty_and_fails_writes() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new(), "http://127.0.0.1:1"));
    let storage = Arc::new(JsonFileStorage::open(dir.path().join("ls.json")));
    let store = ClientSessionStore::new(transport, storage);

    assert!(store.list_quiz_history("anonymous").await.is_empty());
    let err = store
        .add_summary("anonymous", &Summary::new("Cells", "raw", "## Cells"))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::RemoteUnavailable(_)));
}

#[tokio::test]
async fn added_quiz_result_is_listed_with_rounded_percentage() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let entry = QuizHistoryEntry::from_attempt("Cells", 2, 3).unwrap();
    let stored = serde_json::to_value(&entry).unwrap();

    Mock::given(method("POST"))
        .and(path("/quiz/history"))
        .and(header("x-user-id", "anonymous"))
        .and(body_partial_json(json!({ "summaryTitle": "Cells", "score": 2, "totalQuestions": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "item": stored.clone() })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/quiz/history"))
        .and(query_param("userId", "anonymous"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [stored] })))
        .mount(&server)
        .await;

    let store = store_for(&server, &dir);
    let history = store.add_quiz_history("anonymous", &entry).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].summary_title, "Cells");
    assert_eq!(history[0].percentage, 67);
}

#[tokio::test]
async fn remembered_login_scopes_requests_and_survives_restart() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": { "email": "ada@example.com" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/schedules"))
        .and(query_param("userId", "ada@example.com"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "_id": "t1",
                "summaryId": "s1",
                "summaryTitle": "Cells",
                "hours": 2,
                "isCompleted": true
            }]
        })))
        .mount(&server)
        .await;

    let mut store = store_for(&server, &dir);
    store.login("ada@example.com", "pw", true).await.unwrap();
    assert_eq!(store.partition_key(), "ada@example.com");

    // A new process picks the session back up from disk.
    let restarted = store_for(&server, &dir);
    assert_eq!(restarted.session_state(), SessionState::LoggedIn { persisted: true });
    let tasks = restarted.list_schedule(restarted.partition_key()).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "t1");
}

#[tokio::test]
async fn ephemeral_login_is_gone_after_restart() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-2",
            "user": { "email": "bob@example.com" }
        })))
        .mount(&server)
        .await;

    let mut store = store_for(&server, &dir);
    store.login("bob@example.com", "pw", false).await.unwrap();
    assert_eq!(store.session_state(), SessionState::LoggedIn { persisted: false });

    let restarted = store_for(&server, &dir);
    assert_eq!(restarted.session_state(), SessionState::LoggedOut);
    assert_eq!(restarted.partition_key(), "anonymous");
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let mut store = store_for(&server, &dir);
    let err = store.login("ada@example.com", "wrong", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(store.session_state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn logout_clears_local_storage() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("local_storage.json");
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-3",
            "user": { "email": "ada@example.com" }
        })))
        .mount(&server)
        .await;

    let mut store = store_for(&server, &dir);
    store.login("ada@example.com", "pw", true).await.unwrap();
    store.logout();

    let storage = JsonFileStorage::open(&file);
    assert_eq!(storage.get("currentUser").unwrap(), None);
    assert_eq!(storage.get("authToken").unwrap(), None);
}
