use crate::constants::MediaType;
use crate::error::ApiError;
use crate::models::{StoredFile, UploadedMedia};
use crate::services::FileService;
use axum::{
    body::Body,
    extract::{FromRequest, Multipart, State},
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;

/// Upload step configuration: which media type the route accepts and where
/// the files go. Built once per route when the router is assembled.
#[derive(Clone)]
pub struct MediaUpload {
    files: Arc<FileService>,
    media_type: MediaType,
}

impl MediaUpload {
    pub fn new(files: Arc<FileService>, media_type: MediaType) -> Self {
        Self { files, media_type }
    }
}

/// Parse a multipart body, store the files of the configured media type and
/// hand the result to the rest of the chain as an [`UploadedMedia`]
/// extension. Stored files are removed again when the chain does not succeed.
pub async fn upload_media(
    State(upload): State<MediaUpload>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut forwarded = without_body(&req);

    let multipart = match Multipart::from_request(req, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return ApiError::Upload(rejection.body_text()).into_response();
        }
    };

    let media = match collect(&upload, multipart).await {
        Ok(media) => media,
        Err((err, stored)) => {
            let keys: Vec<&str> = stored.iter().map(|f| f.path.as_str()).collect();
            upload.files.remove_all(keys).await;
            return err.into_response();
        }
    };

    tracing::debug!(
        "Upload of {} accepted {} file(s) and {} field(s)",
        upload.media_type,
        media.files.len(),
        media.fields.len()
    );

    let stored: Vec<String> = media.files.iter().map(|f| f.path.clone()).collect();
    forwarded.extensions_mut().insert(media);

    let response = next.run(forwarded).await;

    if !response.status().is_success() && !stored.is_empty() {
        tracing::debug!(
            "Request rejected with {}, discarding {} uploaded file(s)",
            response.status(),
            stored.len()
        );
        upload
            .files
            .remove_all(stored.iter().map(String::as_str))
            .await;
    }

    response
}

async fn collect(
    upload: &MediaUpload,
    mut multipart: Multipart,
) -> Result<UploadedMedia, (ApiError, Vec<StoredFile>)> {
    let mut files: Vec<StoredFile> = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err((ApiError::Upload(e.body_text()), files)),
        };

        let name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            match field.text().await {
                Ok(value) => {
                    fields.insert(name, value);
                    continue;
                }
                Err(e) => return Err((ApiError::Upload(e.body_text()), files)),
            }
        };

        if name != upload.media_type.field_name() {
            return Err((
                ApiError::Upload(format!(
                    "unexpected file field '{}', expected '{}'",
                    name,
                    upload.media_type.field_name()
                )),
                files,
            ));
        }

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !upload.media_type.accepts(&mime_type) {
            return Err((
                ApiError::Upload(format!(
                    "{} files of type {} are not accepted",
                    upload.media_type, mime_type
                )),
                files,
            ));
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => return Err((ApiError::Upload(e.body_text()), files)),
        };
        if data.is_empty() {
            return Err((
                ApiError::Upload(format!("file '{}' is empty", original_name)),
                files,
            ));
        }

        match upload
            .files
            .store(upload.media_type, &original_name, &mime_type, &data)
            .await
        {
            Ok(stored) => files.push(stored),
            Err(e) => return Err((ApiError::Internal(e), files)),
        }
    }

    Ok(UploadedMedia {
        media_type: upload.media_type,
        files,
        fields,
    })
}

/// Copy of the request head with an empty body; the multipart body is
/// consumed by this step.
fn without_body(req: &Request<Body>) -> Request<Body> {
    let mut forwarded = Request::new(Body::empty());
    *forwarded.method_mut() = req.method().clone();
    *forwarded.uri_mut() = req.uri().clone();
    *forwarded.version_mut() = req.version();
    *forwarded.headers_mut() = req.headers().clone();
    forwarded.headers_mut().remove(header::CONTENT_LENGTH);
    *forwarded.extensions_mut() = req.extensions().clone();
    forwarded
}
