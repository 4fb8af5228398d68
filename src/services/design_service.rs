use crate::error::ApiError;
use crate::models::{
    CreateDesignForm, Design, DesignWithMedia, Media, SendEmailRequest, UpdatePictureRequest,
    UploadedMedia,
};
use crate::services::{DesignStore, EmailError, FileService, Mailer, OutgoingEmail};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct DesignService {
    store: Arc<dyn DesignStore>,
    files: Arc<FileService>,
    mailer: Arc<dyn Mailer>,
}

impl DesignService {
    pub fn new(
        store: Arc<dyn DesignStore>,
        files: Arc<FileService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            store,
            files,
            mailer,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Design>, ApiError> {
        Ok(self.store.list().await?)
    }

    pub async fn get_one(&self, id: Uuid) -> Result<Design, ApiError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| design_not_found(id))
    }

    pub async fn get_with_media(&self, id: Uuid) -> Result<DesignWithMedia, ApiError> {
        self.store
            .find_with_media(id)
            .await?
            .ok_or_else(|| design_not_found(id))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Design>, ApiError> {
        Ok(self.store.find_by_name(name).await?)
    }

    /// Persist a validated design together with the files the upload step stored.
    /// The first file becomes the design's picture.
    pub async fn create(
        &self,
        form: &CreateDesignForm,
        upload: &UploadedMedia,
    ) -> Result<DesignWithMedia, ApiError> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let media: Vec<Media> = upload
            .files
            .iter()
            .map(|file| Media {
                id: Uuid::new_v4(),
                ref_id: id,
                media_type: upload.media_type,
                file_name: file.file_name.clone(),
                original_name: file.original_name.clone(),
                mime_type: file.mime_type.clone(),
                path: file.path.clone(),
                size: file.size,
                created_at: now,
            })
            .collect();

        let design = Design {
            id,
            name: form.name().to_string(),
            description: form.description.clone(),
            picture: media.first().map(|m| m.path.clone()),
            created_at: now,
            updated_at: now,
        };

        if !self.store.insert(&design, &media).await? {
            return Err(name_taken(&design.name));
        }
        tracing::info!("Created design {} ({}) with {} file(s)", design.name, id, media.len());

        Ok(DesignWithMedia { design, media })
    }

    /// Remove a design, its media rows and the stored files behind them
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let existing = self.get_with_media(id).await?;

        if self.store.delete(id).await? == 0 {
            return Err(design_not_found(id));
        }

        let keys: Vec<&str> = existing.media.iter().map(|m| m.path.as_str()).collect();
        self.files.remove_all(keys).await;

        tracing::info!("Deleted design {} ({})", existing.design.name, id);
        Ok(())
    }

    pub async fn update_picture(&self, request: &UpdatePictureRequest) -> Result<Design, ApiError> {
        let design = self.get_one(request.id).await?;

        let media = self
            .store
            .find_media(request.media_id)
            .await?
            .filter(|m| m.ref_id == design.id)
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Media {} not found for design {}",
                    request.media_id, design.id
                ))
            })?;

        if !self
            .store
            .update_picture(design.id, &media.path, Utc::now())
            .await?
        {
            return Err(design_not_found(design.id));
        }

        self.get_one(design.id).await
    }

    pub async fn send_email(&self, request: &SendEmailRequest) -> Result<(), ApiError> {
        let design = self.get_with_media(request.id).await?;
        let email = compose_email(&design, request);

        self.mailer.send(email).await.map_err(|e| match e {
            EmailError::NotConfigured => ApiError::EmailUnavailable,
            EmailError::Address(e) => ApiError::field("to", e.to_string()),
            other => {
                tracing::error!("Failed to send email for design {}: {}", request.id, other);
                ApiError::EmailFailed(other.to_string())
            }
        })
    }
}

fn design_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Design {} not found", id))
}

fn name_taken(name: &str) -> ApiError {
    ApiError::Conflict(format!("Design '{}' already exists", name))
}

fn compose_email(design: &DesignWithMedia, request: &SendEmailRequest) -> OutgoingEmail {
    let mut body = String::new();
    if let Some(message) = request.message.as_deref().filter(|m| !m.trim().is_empty()) {
        body.push_str(message.trim());
        body.push_str("\n\n");
    }
    body.push_str(&format!("Design: {}\n", design.design.name));
    if let Some(description) = &design.design.description {
        body.push_str(&format!("Description: {}\n", description));
    }
    if let Some(picture) = &design.design.picture {
        body.push_str(&format!("Picture: {}\n", picture));
    }
    if !design.media.is_empty() {
        body.push_str("Files:\n");
        for m in &design.media {
            body.push_str(&format!("  - {} ({})\n", m.original_name, m.path));
        }
    }

    OutgoingEmail {
        to: request.to.clone(),
        subject: format!("Design: {}", design.design.name),
        body,
    }
}
