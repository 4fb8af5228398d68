use crate::models::{Design, DesignWithMedia, Media};
use crate::services::DesignStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// Process-local store, selected with `database.backend = "memory"`
#[derive(Default)]
pub struct MemoryDesignStore {
    designs: DashMap<Uuid, Design>,
    media: DashMap<Uuid, Media>,
    // Unique name index; claiming an entry holds its shard lock
    names: DashMap<String, Uuid>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn media_of(&self, design_id: Uuid) -> Vec<Media> {
        let mut media: Vec<Media> = self
            .media
            .iter()
            .filter(|m| m.ref_id == design_id)
            .map(|m| m.value().clone())
            .collect();
        media.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        media
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn list(&self) -> Result<Vec<Design>> {
        let mut designs: Vec<Design> = self.designs.iter().map(|d| d.value().clone()).collect();
        designs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(designs)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Design>> {
        Ok(self.designs.get(&id).map(|d| d.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Design>> {
        Ok(self
            .designs
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value().clone()))
    }

    async fn find_with_media(&self, id: Uuid) -> Result<Option<DesignWithMedia>> {
        let Some(design) = self.find(id).await? else {
            return Ok(None);
        };
        Ok(Some(DesignWithMedia {
            media: self.media_of(id),
            design,
        }))
    }

    async fn find_media(&self, media_id: Uuid) -> Result<Option<Media>> {
        Ok(self.media.get(&media_id).map(|m| m.value().clone()))
    }

    async fn insert(&self, design: &Design, media: &[Media]) -> Result<bool> {
        if self.designs.contains_key(&design.id) {
            anyhow::bail!("design {} already exists", design.id);
        }
        match self.names.entry(design.name.clone()) {
            Entry::Occupied(_) => return Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(design.id);
            }
        }
        self.designs.insert(design.id, design.clone());
        for m in media {
            self.media.insert(m.id, m.clone());
        }
        Ok(true)
    }

    async fn update_picture(
        &self,
        id: Uuid,
        picture: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        match self.designs.get_mut(&id) {
            Some(mut design) => {
                design.picture = Some(picture.to_string());
                design.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let removed = self.designs.remove(&id);
        if let Some((_, design)) = &removed {
            self.names.remove_if(&design.name, |_, owner| *owner == id);
        }
        self.media.retain(|_, m| m.ref_id != id);
        Ok(removed.is_some() as u64)
    }
}
