use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::models::{
    CreateDesignForm, Design, DesignWithMedia, SendEmailRequest, SendEmailResponse,
    UpdatePictureRequest, UploadedMedia,
};
use crate::state::AppState;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::field("id", format!("Invalid design id: {}", e)))
}

/// GET /design
pub async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Design>>, ApiError> {
    let designs = state.design_service.get_all().await?;
    Ok(Json(designs))
}

/// GET /design/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Design>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.design_service.get_one(id).await?))
}

/// GET /designgetById/{id}: the design with its media rows
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DesignWithMedia>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.design_service.get_with_media(id).await?))
}

/// POST /design, after upload, validation and the duplicate check
pub async fn create(
    State(state): State<AppState>,
    Extension(form): Extension<CreateDesignForm>,
    Extension(upload): Extension<UploadedMedia>,
) -> Result<(StatusCode, Json<DesignWithMedia>), ApiError> {
    let created = state.design_service.create(&form, &upload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /design, after `validation_delete` loaded the target
pub async fn delete(
    State(state): State<AppState>,
    Extension(design): Extension<Design>,
) -> Result<StatusCode, ApiError> {
    state.design_service.delete(design.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /design/update_picture
pub async fn update_picture(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdatePictureRequest>,
) -> Result<Json<Design>, ApiError> {
    let design = state.design_service.update_picture(&request).await?;
    tracing::info!("Design {} picture set to media {}", design.id, request.media_id);
    Ok(Json(design))
}

/// POST /design/send_email
pub async fn send_email(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    request.validate()?;
    state.design_service.send_email(&request).await?;
    Ok(Json(SendEmailResponse {
        sent: true,
        to: request.to,
    }))
}
