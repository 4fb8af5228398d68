use super::support::{get, json_request, send, MultipartBuilder, TestApp};
use crate::constants::MediaType;
use crate::middleware::{upload_media, validation_create, MediaUpload};
use crate::models::{CreateDesignForm, UploadedMedia};
use crate::services::FileService;
use axum::{
    body::Body,
    extract::Extension,
    handler::Handler,
    http::{header, Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::post,
    Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceBuilder;

#[tokio::test]
async fn upload_runs_before_create_validation() {
    let app = TestApp::new();

    // A JSON body with every field the validator wants still fails in the
    // upload step, so validation never saw it.
    let request = json_request("POST", "/design", &json!({ "name": "Logo" }));
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "upload_error");
}

#[tokio::test]
async fn create_validation_runs_before_existence_check() {
    let app = TestApp::new();
    app.create_design("Logo").await;

    // Duplicate name and no file: validation answers first
    let request = MultipartBuilder::new()
        .text("name", "Logo")
        .into_request("/design");
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn delete_validation_runs_before_delete() {
    let app = TestApp::new();
    let created = app.create_design("Logo").await;

    let (status, _) = app
        .send(json_request("DELETE", "/design", &json!({ "id": "nope" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = created["id"].as_str().unwrap();
    let (status, _) = app.send(get(&format!("/design/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
}

/// Upload + validation in front of a counting handler, outside the real routes
fn counting_router(files: Arc<FileService>, calls: Arc<AtomicUsize>) -> Router {
    let chain = ServiceBuilder::new()
        .layer(from_fn_with_state(
            MediaUpload::new(files, MediaType::Design),
            upload_media,
        ))
        .layer(from_fn(validation_create));

    let handler = move |Extension(form): Extension<CreateDesignForm>,
                        Extension(upload): Extension<UploadedMedia>| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(upload.files.len(), 1);
            (StatusCode::CREATED, form.name().to_string())
        }
    };

    Router::new().route("/counted", post(handler.layer(chain)))
}

#[tokio::test]
async fn handler_sees_upload_and_form_only_after_both_steps_pass() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(FileService::with_root(dir.path()));
    let calls = Arc::new(AtomicUsize::new(0));
    let router = counting_router(files.clone(), calls.clone());

    let valid = MultipartBuilder::new()
        .text("name", "Sample")
        .file("design", "sample.gif", "image/gif", b"GIF89a")
        .into_request("/counted");
    let (status, body) = send(&router, valid).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!("Sample"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let invalid = MultipartBuilder::new()
        .file("design", "sample.gif", "image/gif", b"GIF89a")
        .into_request("/counted");
    let (status, _) = send(&router, invalid).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_multipart_body_never_reaches_handler() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(FileService::with_root(dir.path()));
    let calls = Arc::new(AtomicUsize::new(0));
    let router = counting_router(files, calls.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/counted")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=Sample"))
        .unwrap();
    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "upload_error");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
