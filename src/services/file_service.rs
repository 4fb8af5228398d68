use crate::config::StorageConfig;
use crate::constants::MediaType;
use crate::models::StoredFile;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Local filesystem storage for uploaded media
pub struct FileService {
    root: PathBuf,
}

impl FileService {
    pub fn new(storage: &StorageConfig) -> Self {
        Self::with_root(&storage.root)
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload under `{root}/{media_type}/{uuid}.{ext}`.
    pub async fn store(
        &self,
        media_type: MediaType,
        original_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<StoredFile> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));

        let file_name = match ext {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        // Object key under configured root
        let key = format!("{}/{}", media_type.as_str(), file_name);
        let target = self.root.join(&key);

        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        fs::write(&target, bytes)
            .await
            .with_context(|| format!("failed to write {}", target.display()))?;

        tracing::debug!("Stored {} ({} bytes) as {}", original_name, bytes.len(), key);

        Ok(StoredFile {
            file_name,
            original_name: original_name.to_string(),
            mime_type: mime_type.to_string(),
            path: key,
            size: bytes.len() as i64,
        })
    }

    /// Remove a stored file by key. A file that is already gone is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let target = self.resolve(key)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", target.display())),
        }
    }

    /// Remove several files, logging failures instead of stopping at the first one
    pub async fn remove_all<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            if let Err(e) = self.remove(key).await {
                tracing::warn!("Failed to remove stored file {}: {:#}", key, e);
            }
        }
    }

    #[cfg(test)]
    pub async fn exists(&self, key: &str) -> bool {
        match self.resolve(key) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    // Keys come from the database; never let one escape the root
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("invalid storage key: {}", key);
        }
        Ok(self.root.join(relative))
    }
}
