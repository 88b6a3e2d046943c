use std::sync::Arc;

use crate::errors::MediaError;
use crate::models::FileId;
use crate::services::media_api::MediaApi;
use crate::services::store::FileListStore;

/// Removes files by id. No confirmation, no optimistic removal and no
/// guard against parallel calls: each call refreshes the store on its own.
pub struct DeleteController {
    api: Arc<dyn MediaApi>,
    store: Arc<FileListStore>,
}

impl DeleteController {
    pub fn new(api: Arc<dyn MediaApi>, store: Arc<FileListStore>) -> Self {
        Self { api, store }
    }

    pub async fn delete(&self, id: FileId) -> Result<(), MediaError> {
        let result = self.api.delete_file(id).await;
        if let Err(e) = &result {
            tracing::error!("Delete of file {} failed: {}", id, e);
        }

        let refreshed = self.store.refresh().await;
        result?;
        refreshed?;
        Ok(())
    }
}
