use crate::services::{
    DesignService, EmailError, FileService, Mailer, MemoryDesignStore, OutgoingEmail,
};
use crate::routes::create_app;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "design-test-boundary";

/// Mailer that keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    // Held so the storage directory outlives the test
    pub storage: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_upload_limit(DEFAULT_UPLOAD_LIMIT)
    }

    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let (router, storage) = build_router_with_limit(mailer.clone(), max_upload_bytes);
        Self {
            router,
            mailer,
            storage,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }

    /// Number of files currently stored for the design media type
    pub fn stored_files(&self) -> usize {
        count_files(&self.storage.path().join("design"))
    }

    /// Create a design with one PNG and return the response body
    pub async fn create_design(&self, name: &str) -> Value {
        let request = MultipartBuilder::new()
            .text("name", name)
            .file("design", "logo.png", "image/png", b"\x89PNG fake")
            .into_request("/design");
        let (status, body) = self.send(request).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body
    }
}

const DEFAULT_UPLOAD_LIMIT: usize = 1024 * 1024;

pub fn build_router(mailer: Arc<dyn Mailer>) -> (Router, TempDir) {
    build_router_with_limit(mailer, DEFAULT_UPLOAD_LIMIT)
}

fn build_router_with_limit(mailer: Arc<dyn Mailer>, max_upload_bytes: usize) -> (Router, TempDir) {
    let storage = tempfile::tempdir().unwrap();
    let files = Arc::new(FileService::with_root(storage.path()));
    let store = Arc::new(MemoryDesignStore::new());
    let design_service = Arc::new(DesignService::new(store, files.clone(), mailer));
    let state = AppState::new(design_service, files, max_upload_bytes);
    (create_app(state), storage)
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request with a raw body and an optional content type
pub fn raw_request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn count_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(Result::ok).count(),
        Err(_) => 0,
    }
}

/// Hand-assembled `multipart/form-data` body
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
