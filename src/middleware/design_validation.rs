use crate::error::ApiError;
use crate::models::{CreateDesignForm, DeleteDesignRequest, UploadedMedia};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use validator::Validate;

/// Validate the text fields of a design upload and require at least one file.
/// Runs after `upload_media`, so the form arrives as an [`UploadedMedia`].
pub async fn validation_create(mut req: Request<Body>, next: Next) -> Response {
    let Some(upload) = req.extensions().get::<UploadedMedia>() else {
        tracing::error!("validation_create ran without an upload step in front of it");
        return ApiError::Internal(anyhow::anyhow!("upload context missing")).into_response();
    };

    let form = CreateDesignForm::from_fields(&upload.fields);
    let missing_file = upload.files.is_empty();
    let field_name = upload.media_type.field_name();

    if let Err(errors) = form.validate() {
        return ApiError::from(errors).into_response();
    }
    if missing_file {
        return ApiError::field(field_name, format!("a {} file is required", field_name))
            .into_response();
    }

    req.extensions_mut().insert(form);
    next.run(req).await
}

/// Reject a create when a design with the same name already exists
pub async fn is_design_exists_create(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(name) = req
        .extensions()
        .get::<CreateDesignForm>()
        .map(|form| form.name().to_string())
    else {
        tracing::error!("is_design_exists_create ran before validation_create");
        return ApiError::Internal(anyhow::anyhow!("validated form missing")).into_response();
    };

    match state.design_service.find_by_name(&name).await {
        Ok(Some(existing)) => ApiError::Conflict(format!(
            "Design '{}' already exists ({})",
            existing.name, existing.id
        ))
        .into_response(),
        Ok(None) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

/// Validate `{ "id": "<uuid>" }` and load the design it names. The loaded
/// design is attached for the delete handler and the body is passed on intact.
pub async fn validation_delete(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_upload_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiError::validation(format!("failed to read request body: {}", e))
                .into_response()
        }
    };

    let request: DeleteDesignRequest = if bytes.is_empty() {
        DeleteDesignRequest { id: None }
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(request) => request,
            Err(e) => {
                return ApiError::field("id", format!("invalid request body: {}", e))
                    .into_response()
            }
        }
    };

    if let Err(errors) = request.validate() {
        return ApiError::from(errors).into_response();
    }
    let Some(id) = request.id else {
        return ApiError::field("id", "id is required").into_response();
    };

    let design = match state.design_service.get_one(id).await {
        Ok(design) => design,
        Err(e) => return e.into_response(),
    };

    parts.extensions.insert(design);
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
