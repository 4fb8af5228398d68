use crate::services::{DesignService, FileService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub design_service: Arc<DesignService>,
    pub file_service: Arc<FileService>,
    /// Request body limit for uploads, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        design_service: Arc<DesignService>,
        file_service: Arc<FileService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            design_service,
            file_service,
            max_upload_bytes,
        }
    }
}
