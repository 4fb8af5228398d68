use crate::models::{DbPool, Design, DesignWithMedia, Media};
use crate::services::DesignStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const DESIGN_COLUMNS: &str = "id, name, description, picture, created_at, updated_at";
const MEDIA_COLUMNS: &str =
    "id, ref_id, media_type, file_name, original_name, mime_type, path, size, created_at";

pub struct MySqlDesignStore {
    pool: DbPool,
}

impl MySqlDesignStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DesignStore for MySqlDesignStore {
    async fn list(&self) -> Result<Vec<Design>> {
        let designs = sqlx::query_as::<_, Design>(&format!(
            "SELECT {} FROM designs ORDER BY created_at DESC",
            DESIGN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(designs)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Design>> {
        let design = sqlx::query_as::<_, Design>(&format!(
            "SELECT {} FROM designs WHERE id = ?",
            DESIGN_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(design)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Design>> {
        let design = sqlx::query_as::<_, Design>(&format!(
            "SELECT {} FROM designs WHERE name = ? LIMIT 1",
            DESIGN_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(design)
    }

    async fn find_with_media(&self, id: Uuid) -> Result<Option<DesignWithMedia>> {
        let Some(design) = self.find(id).await? else {
            return Ok(None);
        };

        let media = sqlx::query_as::<_, Media>(&format!(
            "SELECT {} FROM media WHERE ref_id = ? AND media_type = 'design' ORDER BY created_at",
            MEDIA_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(DesignWithMedia { design, media }))
    }

    async fn find_media(&self, media_id: Uuid) -> Result<Option<Media>> {
        let media = sqlx::query_as::<_, Media>(&format!(
            "SELECT {} FROM media WHERE id = ?",
            MEDIA_COLUMNS
        ))
        .bind(media_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(media)
    }

    async fn insert(&self, design: &Design, media: &[Media]) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO designs (id, name, description, picture, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(design.id.to_string())
        .bind(&design.name)
        .bind(&design.description)
        .bind(&design.picture)
        .bind(design.created_at)
        .bind(design.updated_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            // uk_designs_name: a concurrent create won the name
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tx.rollback().await?;
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }

        for m in media {
            sqlx::query(
                r#"
                INSERT INTO media (id, ref_id, media_type, file_name, original_name, mime_type, path, size, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(m.id.to_string())
            .bind(m.ref_id.to_string())
            .bind(m.media_type.as_str())
            .bind(&m.file_name)
            .bind(&m.original_name)
            .bind(&m.mime_type)
            .bind(&m.path)
            .bind(m.size)
            .bind(m.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn update_picture(
        &self,
        id: Uuid,
        picture: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE designs SET picture = ?, updated_at = ? WHERE id = ?")
            .bind(picture)
            .bind(updated_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM media WHERE ref_id = ? AND media_type = 'design'")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM designs WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
