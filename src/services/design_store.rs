use crate::models::{Design, DesignWithMedia, Media};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persistence of designs and the media rows attached to them
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// All designs, newest first
    async fn list(&self) -> Result<Vec<Design>>;

    async fn find(&self, id: Uuid) -> Result<Option<Design>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Design>>;

    /// Design left-joined with its media rows
    async fn find_with_media(&self, id: Uuid) -> Result<Option<DesignWithMedia>>;

    async fn find_media(&self, media_id: Uuid) -> Result<Option<Media>>;

    /// Insert a design together with its media rows. Returns false, with
    /// nothing written, when another design already holds the name.
    async fn insert(&self, design: &Design, media: &[Media]) -> Result<bool>;

    /// Returns false when the design does not exist
    async fn update_picture(
        &self,
        id: Uuid,
        picture: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Delete a design and its media rows, returning the number of designs removed
    async fn delete(&self, id: Uuid) -> Result<u64>;
}
