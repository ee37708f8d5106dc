#![allow(dead_code)]

//! In-process fake of the pdfkit backend, bound to an ephemeral local port.

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use pdfkit_link::{AuthStore, PdfLinkClient, PdfLinkTimeouts, SessionEvents};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const PASSWORD: &str = "secret";

/// Mutable knobs and observations shared with the handlers.
#[derive(Default)]
pub struct BackendState {
    pub access_token: String,
    pub refresh_token: String,
    /// Rotation counter used to mint new token pairs
    pub generation: u32,
    /// Reject every bearer token, even a freshly refreshed one
    pub reject_all_tokens: bool,
    /// Refresh endpoint answers 401
    pub refresh_fails: bool,
    pub refresh_calls: u32,
    pub logout_calls: u32,
    /// `(method path, Authorization header)` of every authenticated call
    pub seen: Vec<(String, Option<String>)>,
    pub submits: Vec<(String, Value)>,
    pub files: HashMap<String, (String, Vec<u8>)>,
    pub upload_queries: Vec<String>,
    /// Responses of the job status endpoint, last one repeats
    pub job_script: VecDeque<Value>,
    pub job_fetches: u32,
}

#[derive(Clone)]
pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(BackendState {
            access_token: "a1".into(),
            refresh_token: "r1".into(),
            generation: 1,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/refresh", post(refresh))
            .route("/api/v1/auth/logout", post(logout))
            .route("/api/v1/files", post(upload))
            .route("/api/v1/files/usage", get(usage))
            .route("/api/v1/files/:id", delete(delete_file))
            .route("/api/v1/files/:id/metadata", get(metadata))
            .route("/api/v1/files/:id/download", get(download))
            .route("/api/v1/pdf/jobs", get(list_jobs))
            .route("/api/v1/pdf/jobs/:id", get(job_status))
            .route("/api/v1/pdf/:tool", post(submit))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn client(&self, store: AuthStore, events: SessionEvents) -> PdfLinkClient {
        PdfLinkClient::builder()
            .base_url(&self.base_url)
            .timeouts(PdfLinkTimeouts::for_testing(10, 20))
            .auth_store(store)
            .event_handlers(events)
            .build()
            .expect("build client")
    }

    /// Client whose store already holds a session with the given tokens.
    pub fn client_with_session(&self, access: &str, refresh: &str, events: SessionEvents) -> PdfLinkClient {
        let store = AuthStore::in_memory();
        store.login(user_info(), access, refresh).expect("seed session");
        self.client(store, events)
    }
}

pub fn user_info() -> pdfkit_link::UserInfo {
    pdfkit_link::UserInfo {
        id: "u1".into(),
        email: "alice@example.com".into(),
        first_name: "Alice".into(),
        last_name: "Liddell".into(),
        roles: vec!["USER".into()],
    }
}

pub fn job_json(status: &str, result_file_id: Option<&str>, error_message: Option<&str>) -> Value {
    let progress = if status == "COMPLETED" { 100 } else { 40 };
    json!({
        "id": "job-1",
        "status": status,
        "progress": progress,
        "resultFileId": result_file_id,
        "errorMessage": error_message,
    })
}

type Shared = State<Arc<Mutex<BackendState>>>;

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data, "timestamp": "2026-01-01T00:00:00Z" })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "data": null, "message": message }))).into_response()
}

/// Records the call and checks the bearer token.
fn authorize(state: &mut BackendState, label: String, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    state.seen.push((label, header.clone()));

    let expected = format!("Bearer {}", state.access_token);
    if state.reject_all_tokens || header.as_deref() != Some(expected.as_str()) {
        return Err(fail(StatusCode::UNAUTHORIZED, "Token expired"));
    }
    Ok(())
}

fn token_payload(state: &BackendState) -> Value {
    json!({
        "accessToken": state.access_token,
        "refreshToken": state.refresh_token,
        "expiresIn": 900,
        "user": {
            "id": "u1",
            "email": "alice@example.com",
            "firstName": "Alice",
            "lastName": "Liddell",
            "roles": ["USER"]
        }
    })
}

async fn login(State(state): Shared, Json(body): Json<Value>) -> Response {
    let state = state.lock().unwrap();
    if body["password"] != PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    ok(token_payload(&state))
}

async fn refresh(State(state): Shared, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.refresh_calls += 1;
    if state.refresh_fails || body["refreshToken"] != state.refresh_token.as_str() {
        return fail(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    }
    state.generation += 1;
    state.access_token = format!("a{}", state.generation);
    state.refresh_token = format!("r{}", state.generation);
    ok(json!({
        "accessToken": state.access_token,
        "refreshToken": state.refresh_token,
    }))
}

async fn logout(State(state): Shared) -> Response {
    state.lock().unwrap().logout_calls += 1;
    ok(Value::Null)
}

async fn upload(
    State(state): Shared,
    axum::extract::RawQuery(query): axum::extract::RawQuery,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let authorized = {
        let mut guard = state.lock().unwrap();
        authorize(&mut guard, "POST /api/v1/files".into(), &headers)
    };
    if let Err(denied) = authorized {
        return denied;
    }

    let mut stored = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.unwrap_or_default().to_vec();
        stored = Some((name, content_type, bytes));
    }

    let Some((name, content_type, bytes)) = stored else {
        return fail(StatusCode::BAD_REQUEST, "missing file part");
    };

    let mut state = state.lock().unwrap();
    state.upload_queries.push(query.unwrap_or_default());
    let file_id = format!("f{}", state.files.len() + 1);
    let size = bytes.len();
    state.files.insert(file_id.clone(), (name.clone(), bytes));
    ok(json!({
        "fileId": file_id,
        "fileName": name,
        "contentType": content_type,
        "sizeBytes": size,
        "downloadUrl": format!("/api/v1/files/{}/download", file_id),
    }))
}

async fn usage(State(state): Shared, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, "GET /api/v1/files/usage".into(), &headers) {
        return denied;
    }
    ok(json!({
        "totalBytes": 1000,
        "usedBytes": 250,
        "availableBytes": 750,
        "fileCount": state.files.len(),
    }))
}

async fn metadata(State(state): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, format!("GET /api/v1/files/{}/metadata", id), &headers) {
        return denied;
    }
    match state.files.get(&id) {
        Some((name, bytes)) => ok(json!({
            "fileId": id,
            "fileName": name,
            "contentType": "application/pdf",
            "sizeBytes": bytes.len(),
        })),
        None => fail(StatusCode::NOT_FOUND, "File not found"),
    }
}

async fn download(State(state): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, format!("GET /api/v1/files/{}/download", id), &headers) {
        return denied;
    }
    match state.files.get(&id) {
        Some((_, bytes)) => bytes.clone().into_response(),
        None => fail(StatusCode::NOT_FOUND, "File not found"),
    }
}

async fn delete_file(State(state): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, format!("DELETE /api/v1/files/{}", id), &headers) {
        return denied;
    }
    match state.files.remove(&id) {
        Some(_) => ok(Value::Null),
        None => fail(StatusCode::NOT_FOUND, "File not found"),
    }
}

async fn submit(
    State(state): Shared,
    Path(tool): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, format!("POST /api/v1/pdf/{}", tool), &headers) {
        return denied;
    }
    state.submits.push((tool, body));
    ok(json!({ "jobId": "job-1", "status": "PENDING" }))
}

async fn job_status(State(state): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, format!("GET /api/v1/pdf/jobs/{}", id), &headers) {
        return denied;
    }
    state.job_fetches += 1;
    let next = if state.job_script.len() > 1 {
        state.job_script.pop_front()
    } else {
        state.job_script.front().cloned()
    };
    match next {
        Some(job) => ok(job),
        None => fail(StatusCode::NOT_FOUND, "Job not found"),
    }
}

async fn list_jobs(State(state): Shared, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(denied) = authorize(&mut state, "GET /api/v1/pdf/jobs".into(), &headers) {
        return denied;
    }
    ok(json!({
        "content": [
            { "id": "job-1", "type": "MERGE", "status": "COMPLETED", "progress": 100, "resultFileId": "f9" },
            { "id": "job-2", "type": "OCR", "status": "PROCESSING", "progress": 10 }
        ],
        "totalElements": 2,
        "totalPages": 1
    }))
}
