//! crates/study_aid_core/src/store.rs
//!
//! The `ClientSessionStore` is the single entry point the front end uses for data:
//! session lifecycle plus summaries, schedule and quiz history, all scoped by a
//! partition key (the user's email, or `"anonymous"`).
//!
//! Reads degrade to an empty list when the remote service fails; callers must read
//! "empty" as "unknown". Writes always report failure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::domain::{
    DocumentMeta, QuizHistoryEntry, SavedArtifact, SessionState, StudyTask, Summary, User,
    ANONYMOUS_PARTITION,
};
use crate::ports::{KeyValueStore, PortError, PortResult, RemoteTransport};
use crate::remote::{ApiRequest, ApiResponse, ResponseEnvelope};
use crate::session::SessionManager;

const SUMMARIES_PATH: &str = "/summaries";
const SAVE_SUMMARY_PATH: &str = "/summaries/save";
const SCHEDULES_PATH: &str = "/schedules";
const QUIZ_HISTORY_PATH: &str = "/quiz/history";

/// Everything the dashboard shows, fetched in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyData {
    pub summaries: Vec<Summary>,
    pub schedule: Vec<StudyTask>,
    pub quiz_history: Vec<QuizHistoryEntry>,
}

pub struct ClientSessionStore {
    transport: Arc<dyn RemoteTransport>,
    session: SessionManager,
}

impl ClientSessionStore {
    /// Builds the store, restoring any remembered session from `storage`.
    pub fn new(transport: Arc<dyn RemoteTransport>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            transport,
            session: SessionManager::restore(storage),
        }
    }

    //=====================================================================================
    // Session
    //=====================================================================================

    pub async fn register(&self, email: &str, password: &str) -> PortResult<()> {
        let name = email.split('@').next().unwrap_or(email);
        let request = ApiRequest::post(
            "/auth/register",
            json!({ "name": name, "email": email, "password": password }),
        );
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(rejection(response, |status| format!("Registration failed: {}", status)));
        }
        info!("Registered {}", email);
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str, remember: bool) -> PortResult<User> {
        let request = ApiRequest::post("/auth/login", json!({ "email": email, "password": password }));
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(rejection(response, |status| format!("Login failed: {}", status)));
        }

        let body: LoginBody = response.envelope().into_item()?;
        let user = User {
            email: body.user.email,
        };
        self.session.establish(user.clone(), body.token, remember);
        info!("Logged in as {} (remembered: {})", user.email, remember);
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.session.clear();
        info!("Logged out");
    }

    /// The in-memory user; durable storage is not consulted again.
    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// The current user's email, or `"anonymous"` when logged out.
    ///
    /// All anonymous users share one partition on the remote service.
    pub fn partition_key(&self) -> &str {
        self.current_user()
            .map(|user| user.email.as_str())
            .unwrap_or(ANONYMOUS_PARTITION)
    }

    //=====================================================================================
    // Summaries
    //=====================================================================================

    pub async fn list_summaries(&self, user_key: &str) -> Vec<Summary> {
        self.list(SUMMARIES_PATH, user_key).await
    }

    /// Creates a summary, then returns the re-fetched list.
    pub async fn add_summary(&self, user_key: &str, summary: &Summary) -> PortResult<Vec<Summary>> {
        let mut body = to_json(summary)?;
        // The service's legacy create route reads the summary text as `content`.
        body["content"] = Value::String(summary.summary_content.clone());
        self.create(SUMMARIES_PATH, user_key, body, "Failed to add summary")
            .await?;
        Ok(self.list_summaries(user_key).await)
    }

    /// Stores the source document and its summary together on the remote side.
    pub async fn save_summary_artifact(
        &self,
        user_key: &str,
        document: &DocumentMeta,
        title: &str,
        summary_text: &str,
    ) -> PortResult<SavedArtifact> {
        let body = json!({
            "filename": document.filename,
            "mimetype": document.mimetype,
            "size": document.size,
            "contentJson": { "text": document.text },
            "title": title,
            "sum_notes": summary_text,
        });
        let request = self
            .authorized(ApiRequest::post(SAVE_SUMMARY_PATH, body))
            .header("x-user-id", user_key);
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            let err = rejection(response, |_| "Failed to save summary to DB".to_string());
            error!("Saving summary for {} failed: {}", user_key, err);
            return Err(err);
        }

        let saved: SavedBody = response.envelope().into_item()?;
        Ok(SavedArtifact {
            document_id: saved.doc.id,
            note_id: saved.note.id,
            title: saved.note.title,
            summary_text: saved.note.sum_notes,
        })
    }

    //=====================================================================================
    // Schedule
    //=====================================================================================

    /// The saved schedule. Stored snapshots are resolved to the most recent one's tasks.
    pub async fn list_schedule(&self, user_key: &str) -> Vec<StudyTask> {
        let items: Vec<ScheduleItem> = self.list(SCHEDULES_PATH, user_key).await;
        resolve_schedule(items)
    }

    /// Replaces the whole remote schedule with `tasks`.
    pub async fn save_schedule(&self, user_key: &str, tasks: &[StudyTask]) -> PortResult<()> {
        let body = json!({ "date": Utc::now(), "tasks": tasks });
        self.create(SCHEDULES_PATH, user_key, body, "Failed to save schedule")
            .await
    }

    /// Appends a task for `summary` and saves the whole schedule.
    pub async fn add_study_task(
        &self,
        user_key: &str,
        tasks: &[StudyTask],
        summary: &Summary,
        hours: f64,
    ) -> PortResult<Vec<StudyTask>> {
        let mut updated = tasks.to_vec();
        updated.push(StudyTask::new(summary, hours)?);
        self.save_schedule(user_key, &updated).await?;
        Ok(updated)
    }

    /// Marks one task done or open and saves the whole schedule.
    pub async fn set_task_completion(
        &self,
        user_key: &str,
        tasks: &[StudyTask],
        task_id: &str,
        is_completed: bool,
    ) -> PortResult<Vec<StudyTask>> {
        if !tasks.iter().any(|task| task.id == task_id) {
            return Err(PortError::InvalidInput(format!("no study task with id {}", task_id)));
        }
        let updated: Vec<StudyTask> = tasks
            .iter()
            .cloned()
            .map(|mut task| {
                if task.id == task_id {
                    task.is_completed = is_completed;
                }
                task
            })
            .collect();
        self.save_schedule(user_key, &updated).await?;
        Ok(updated)
    }

    //=====================================================================================
    // Quiz history
    //=====================================================================================

    pub async fn list_quiz_history(&self, user_key: &str) -> Vec<QuizHistoryEntry> {
        self.list(QUIZ_HISTORY_PATH, user_key).await
    }

    /// Records a quiz result, then returns the re-fetched history.
    pub async fn add_quiz_history(
        &self,
        user_key: &str,
        entry: &QuizHistoryEntry,
    ) -> PortResult<Vec<QuizHistoryEntry>> {
        self.create(QUIZ_HISTORY_PATH, user_key, to_json(entry)?, "Failed to add quiz history")
            .await?;
        Ok(self.list_quiz_history(user_key).await)
    }

    //=====================================================================================
    // Aggregate
    //=====================================================================================

    /// Fetches the three lists concurrently; each one degrades on its own.
    pub async fn refresh(&self, user_key: &str) -> StudyData {
        let (summaries, schedule, quiz_history) = futures::join!(
            self.list_summaries(user_key),
            self.list_schedule(user_key),
            self.list_quiz_history(user_key),
        );
        StudyData {
            summaries,
            schedule,
            quiz_history,
        }
    }

    //=====================================================================================
    // Helpers
    //=====================================================================================

    fn authorized(&self, request: ApiRequest) -> ApiRequest {
        request.bearer(self.session.auth_token())
    }

    async fn list<T: serde::de::DeserializeOwned>(&self, path: &str, user_key: &str) -> Vec<T> {
        let request = self.authorized(ApiRequest::get(path).query("userId", user_key));
        match self.fetch_items(request).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Reading {} for {} failed, showing nothing: {}", path, user_key, e);
                Vec::new()
            }
        }
    }

    async fn fetch_items<T: serde::de::DeserializeOwned>(&self, request: ApiRequest) -> PortResult<Vec<T>> {
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(rejection(response, |status| format!("Request failed: {}", status)));
        }
        response.envelope().into_items()
    }

    async fn create(&self, path: &str, user_key: &str, body: Value, fallback: &str) -> PortResult<()> {
        let request = self
            .authorized(ApiRequest::post(path, body))
            .header("x-user-id", user_key);
        let response = self.transport.execute(request).await.map_err(|e| {
            error!("{} for {}: {}", fallback, user_key, e);
            e
        })?;
        if !response.is_success() {
            let err = PortError::RemoteRejected {
                status: response.status,
                message: format!("{}: {}", fallback, response.status),
            };
            error!("{} for {}: HTTP {}", fallback, user_key, response.status);
            return Err(err);
        }
        Ok(())
    }
}

/// Turns a non-2xx response into an error, preferring the `error` or `message` in its body.
fn rejection(response: ApiResponse, fallback: impl FnOnce(u16) -> String) -> PortError {
    let status = response.status;
    let message = match response.envelope() {
        ResponseEnvelope::Error(message) => Some(message),
        ResponseEnvelope::Bare(Value::Object(body)) => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    PortError::RemoteRejected {
        status,
        message: message.unwrap_or_else(|| fallback(status)),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> PortResult<Value> {
    serde_json::to_value(value).map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// Wire Shapes
//=========================================================================================

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    token: Option<String>,
    user: LoginUser,
}

#[derive(Deserialize)]
struct LoginUser {
    email: String,
}

#[derive(Deserialize)]
struct SavedBody {
    doc: StoredRecord,
    note: StoredNote,
}

#[derive(Deserialize)]
struct StoredRecord {
    #[serde(alias = "_id")]
    id: String,
}

#[derive(Deserialize)]
struct StoredNote {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    sum_notes: String,
}

/// The schedule route answers either with tasks or with saved snapshots of the schedule.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScheduleItem {
    Snapshot {
        tasks: Vec<StudyTask>,
        #[serde(rename = "createdAt", default)]
        created_at: Option<DateTime<Utc>>,
    },
    Task(StudyTask),
}

fn resolve_schedule(items: Vec<ScheduleItem>) -> Vec<StudyTask> {
    let mut loose_tasks = Vec::new();
    let mut latest: Option<(Option<DateTime<Utc>>, Vec<StudyTask>)> = None;
    for item in items {
        match item {
            ScheduleItem::Task(task) => loose_tasks.push(task),
            ScheduleItem::Snapshot { tasks, created_at } => {
                // Later entries win ties, so an undated list resolves to its last snapshot.
                let newer = latest
                    .as_ref()
                    .map_or(true, |(seen, _)| created_at >= *seen);
                if newer {
                    latest = Some((created_at, tasks));
                }
            }
        }
    }
    match latest {
        Some((_, tasks)) => tasks,
        None => loose_tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::HttpMethod;
    use crate::session::tests::MemoryStorage;
    use crate::session::{AUTH_TOKEN_KEY, CURRENT_USER_KEY};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers requests from a queue of canned responses and records what it was sent.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<PortResult<ApiResponse>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: Value) -> Self {
            self.responses.lock().unwrap().push_back(Ok(ApiResponse {
                status,
                body: Some(body),
            }));
            self
        }

        fn fail(self) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(PortError::RemoteUnavailable("connection refused".to_string())));
            self
        }

        fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteTransport for ScriptedTransport {
        async fn execute(&self, request: ApiRequest) -> PortResult<ApiResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PortError::RemoteUnavailable("no script left".to_string())))
        }
    }

    fn store_with(transport: ScriptedTransport) -> (ClientSessionStore, Arc<ScriptedTransport>, Arc<MemoryStorage>) {
        let transport = Arc::new(transport);
        let storage = Arc::new(MemoryStorage::default());
        let store = ClientSessionStore::new(transport.clone(), storage.clone());
        (store, transport, storage)
    }

    fn header<'a>(request: &'a ApiRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn summary_json(id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "summaryContent": "## Heading",
            "originalContent": "raw text",
            "createdAt": "2024-05-01T09:30:00Z"
        })
    }

    #[tokio::test]
    async fn register_sends_name_from_email() {
        let (store, transport, _) = store_with(ScriptedTransport::default().reply(201, json!({ "user": {} })));
        store.register("ada@example.com", "pw").await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].path, "/auth/register");
        assert_eq!(
            sent[0].body,
            Some(json!({ "name": "ada", "email": "ada@example.com", "password": "pw" }))
        );
    }

    #[tokio::test]
    async fn register_surfaces_remote_message_or_status() {
        let (store, _, _) = store_with(
            ScriptedTransport::default()
                .reply(409, json!({ "error": "Email already registered" }))
                .reply(500, json!({})),
        );
        let err = store.register("ada@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");

        let err = store.register("ada@example.com", "pw").await.unwrap_err();
        assert_eq!(
            err,
            PortError::RemoteRejected {
                status: 500,
                message: "Registration failed: 500".to_string()
            }
        );
    }

    #[tokio::test]
    async fn rejection_falls_back_to_message_field() {
        let (mut store, _, _) = store_with(
            ScriptedTransport::default().reply(400, json!({ "message": "email is required" })),
        );
        let err = store.login("", "pw", false).await.unwrap_err();
        assert_eq!(err.to_string(), "email is required");
    }

    #[tokio::test]
    async fn login_keeps_token_and_normalized_user() {
        let (mut store, transport, storage) = store_with(
            ScriptedTransport::default()
                .reply(200, json!({ "token": "dev-42", "user": { "id": "42", "name": "ada", "email": "ada@example.com" } }))
                .reply(200, json!({ "items": [] })),
        );
        let user = store.login("ada@example.com", "pw", false).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(store.session_state(), SessionState::LoggedIn { persisted: false });
        assert_eq!(store.partition_key(), "ada@example.com");
        assert!(!storage.contains(AUTH_TOKEN_KEY));

        store.list_summaries("ada@example.com").await;
        assert_eq!(header(&transport.sent()[1], "authorization"), Some("Bearer dev-42"));
    }

    #[tokio::test]
    async fn remembered_login_survives_restart_and_ephemeral_does_not() {
        let (mut store, _, storage) = store_with(
            ScriptedTransport::default()
                .reply(200, json!({ "token": "dev-1", "user": { "email": "ada@example.com" } })),
        );
        store.login("ada@example.com", "pw", true).await.unwrap();
        let restarted = ClientSessionStore::new(Arc::new(ScriptedTransport::default()), storage);
        assert_eq!(restarted.current_user().map(|u| u.email.as_str()), Some("ada@example.com"));

        let (mut store, _, storage) = store_with(
            ScriptedTransport::default()
                .reply(200, json!({ "token": "dev-1", "user": { "email": "ada@example.com" } })),
        );
        store.login("ada@example.com", "pw", false).await.unwrap();
        let restarted = ClientSessionStore::new(Arc::new(ScriptedTransport::default()), storage);
        assert!(restarted.current_user().is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let (mut store, _, _) = store_with(
            ScriptedTransport::default()
                .reply(401, json!({ "error": "Invalid credentials" }))
                .fail(),
        );
        let err = store.login("ada@example.com", "bad", true).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = store.login("ada@example.com", "bad", true).await.unwrap_err();
        assert!(matches!(err, PortError::RemoteUnavailable(_)));
        assert_eq!(store.session_state(), SessionState::LoggedOut);
        assert_eq!(store.partition_key(), ANONYMOUS_PARTITION);
    }

    #[tokio::test]
    async fn login_without_user_is_malformed() {
        let (mut store, _, _) = store_with(ScriptedTransport::default().reply(200, json!({ "token": "t" })));
        let err = store.login("ada@example.com", "pw", false).await.unwrap_err();
        assert!(matches!(err, PortError::MalformedResponse(_)));
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn logout_purges_storage_even_when_never_persisted() {
        let (mut store, _, storage) = store_with(ScriptedTransport::default());
        store.logout();
        assert!(!storage.contains(CURRENT_USER_KEY));

        storage.set(CURRENT_USER_KEY, r#"{"email":"x@y.z"}"#).unwrap();
        storage.set(AUTH_TOKEN_KEY, "stale").unwrap();
        store.logout();
        assert!(!storage.contains(CURRENT_USER_KEY));
        assert!(!storage.contains(AUTH_TOKEN_KEY));
    }

    #[tokio::test]
    async fn list_is_scoped_by_partition_key() {
        let (store, transport, _) = store_with(
            ScriptedTransport::default().reply(200, json!({ "items": [summary_json("s1", "Cells")] })),
        );
        let summaries = store.list_summaries("ada@example.com").await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title, "Cells");

        let sent = transport.sent();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].path, "/summaries");
        assert_eq!(
            sent[0].query,
            vec![("userId".to_string(), "ada@example.com".to_string())]
        );
        assert_eq!(header(&sent[0], "authorization"), None);
    }

    #[tokio::test]
    async fn list_failures_degrade_to_empty() {
        let (store, _, _) = store_with(
            ScriptedTransport::default()
                .reply(500, json!({ "error": "boom" }))
                .fail()
                .reply(200, json!({ "unexpected": true }))
                .reply(200, json!({ "items": [{ "id": 1 }] })),
        );
        assert!(store.list_summaries("k").await.is_empty());
        assert!(store.list_quiz_history("k").await.is_empty());
        assert!(store.list_schedule("k").await.is_empty());
        assert!(store.list_summaries("k").await.is_empty());
    }

    #[tokio::test]
    async fn add_summary_posts_then_refetches() {
        let (store, transport, _) = store_with(
            ScriptedTransport::default()
                .reply(201, json!({ "item": {} }))
                .reply(200, json!({ "items": [summary_json("s1", "Cells"), summary_json("s2", "Atoms")] })),
        );
        let summary = Summary::new("Atoms", "raw", "## Atoms");
        let summaries = store.add_summary("ada@example.com", &summary).await.unwrap();
        assert_eq!(summaries.len(), 2);

        let sent = transport.sent();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(header(&sent[0], "x-user-id"), Some("ada@example.com"));
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["summaryContent"], "## Atoms");
        assert_eq!(body["content"], "## Atoms");
    }

    #[tokio::test]
    async fn add_fails_loudly_but_refetch_degrades() {
        let (store, _, _) = store_with(ScriptedTransport::default().reply(500, json!({})));
        let entry = QuizHistoryEntry::from_attempt("Cells", 3, 4).unwrap();
        let err = store.add_quiz_history("k", &entry).await.unwrap_err();
        assert_eq!(
            err,
            PortError::RemoteRejected {
                status: 500,
                message: "Failed to add quiz history: 500".to_string()
            }
        );

        let (store, _, _) = store_with(ScriptedTransport::default().reply(201, json!({ "item": {} })).fail());
        let history = store.add_quiz_history("k", &entry).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn added_quiz_result_comes_back_with_rounded_percentage() {
        let entry = QuizHistoryEntry::from_attempt("Cells", 2, 3).unwrap();
        let echoed = serde_json::to_value(&entry).unwrap();
        let (store, transport, _) = store_with(
            ScriptedTransport::default()
                .reply(201, json!({ "item": echoed.clone() }))
                .reply(200, json!({ "items": [echoed] })),
        );
        let history = store.add_quiz_history("anonymous", &entry).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].percentage, 67);

        let body = transport.sent()[0].body.clone().unwrap();
        assert_eq!(body["totalQuestions"], 3);
        assert_eq!(body["summaryTitle"], "Cells");
    }

    #[tokio::test]
    async fn schedule_save_sends_whole_collection() {
        let summary = Summary::new("Cells", "raw", "## Cells");
        let (store, transport, _) = store_with(ScriptedTransport::default().reply(201, json!({ "item": {} })).reply(201, json!({ "item": {} })));

        let tasks = store.add_study_task("k", &[], &summary, 2.0).await.unwrap();
        assert_eq!(tasks.len(), 1);
        let tasks = store
            .set_task_completion("k", &tasks, &tasks[0].id, true)
            .await
            .unwrap();
        assert!(tasks[0].is_completed);

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        let body = sent[1].body.as_ref().unwrap();
        assert!(body["date"].is_string());
        assert_eq!(body["tasks"][0]["isCompleted"], true);
        assert_eq!(body["tasks"][0]["hours"], 2.0);
    }

    #[tokio::test]
    async fn schedule_save_failure_is_reported() {
        let (store, _, _) = store_with(ScriptedTransport::default().reply(400, json!({ "error": "date is required" })));
        assert!(matches!(
            store.save_schedule("k", &[]).await,
            Err(PortError::RemoteRejected { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn unknown_task_id_is_rejected_without_a_request() {
        let (store, transport, _) = store_with(ScriptedTransport::default());
        let err = store.set_task_completion("k", &[], "missing", true).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn schedule_snapshots_resolve_to_latest() {
        let task = |id: &str, done: bool| {
            json!({ "id": id, "summaryId": "s1", "summaryTitle": "Cells", "hours": 1, "isCompleted": done })
        };
        let (store, _, _) = store_with(ScriptedTransport::default().reply(
            200,
            json!({ "items": [
                { "id": "a", "date": "2024-05-01", "tasks": [task("t1", false)], "createdAt": "2024-05-01T10:00:00Z" },
                { "id": "b", "date": "2024-05-02", "tasks": [task("t1", true), task("t2", false)], "createdAt": "2024-05-02T10:00:00Z" }
            ] }),
        ));
        let schedule = store.list_schedule("k").await;
        assert_eq!(schedule.len(), 2);
        assert!(schedule[0].is_completed);
    }

    #[tokio::test]
    async fn schedule_accepts_plain_tasks() {
        let (store, _, _) = store_with(ScriptedTransport::default().reply(
            200,
            json!({ "items": [{ "id": "t1", "summaryId": "s1", "summaryTitle": "Cells", "hours": 1.5, "isCompleted": false }] }),
        ));
        let schedule = store.list_schedule("k").await;
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].hours, 1.5);
    }

    #[tokio::test]
    async fn save_artifact_sends_document_and_summary() {
        let (store, transport, _) = store_with(ScriptedTransport::default().reply(
            201,
            json!({
                "doc": { "_id": "d1", "filename": "bio.txt" },
                "note": { "_id": "n1", "docId": "d1", "title": "bio.txt", "sum_notes": "## Bio" }
            }),
        ));
        let meta = DocumentMeta {
            filename: Some("bio.txt".to_string()),
            mimetype: Some("text/plain".to_string()),
            size: Some(12),
            text: "cells divide".to_string(),
        };
        let saved = store
            .save_summary_artifact("ada@example.com", &meta, "bio.txt", "## Bio")
            .await
            .unwrap();
        assert_eq!(saved.document_id, "d1");
        assert_eq!(saved.note_id, "n1");
        assert_eq!(saved.summary_text, "## Bio");

        let body = transport.sent()[0].body.clone().unwrap();
        assert_eq!(body["contentJson"]["text"], "cells divide");
        assert_eq!(body["sum_notes"], "## Bio");
        assert_eq!(body["size"], 12);
    }

    #[tokio::test]
    async fn save_artifact_failure_uses_remote_message() {
        let (store, _, _) = store_with(
            ScriptedTransport::default()
                .reply(500, json!({ "error": "Failed to save summary and document" }))
                .reply(502, json!({})),
        );
        let meta = DocumentMeta::default();
        let err = store.save_summary_artifact("k", &meta, "t", "s").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to save summary and document");

        let err = store.save_summary_artifact("k", &meta, "t", "s").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to save summary to DB");
    }

    #[tokio::test]
    async fn refresh_degrades_each_list_independently() {
        let transport = ScriptedTransport::default()
            .reply(200, json!({ "items": [summary_json("s1", "Cells")] }))
            .fail()
            .reply(500, json!({}));
        let (store, _, _) = store_with(transport);
        let data = store.refresh("k").await;
        assert_eq!(data.summaries.len(), 1);
        assert!(data.schedule.is_empty());
        assert!(data.quiz_history.is_empty());
    }
}
