use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::MediaError;
use crate::models::{UploadPayload, UploadReceipt};
use crate::services::media_api::MediaApi;
use crate::services::store::FileListStore;

/// Sends one file at a time to the backend and reloads the list afterwards.
pub struct UploadController {
    api: Arc<dyn MediaApi>,
    store: Arc<FileListStore>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag even if the upload future is dropped midway.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UploadController {
    pub fn new(api: Arc<dyn MediaApi>, store: Arc<FileListStore>) -> Self {
        Self { api, store, in_flight: AtomicBool::new(false) }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Upload `payload`, then refresh the store whether or not the upload worked.
    ///
    /// A call made while another upload is in flight is rejected with
    /// [`MediaError::UploadInFlight`] and never reaches the backend.
    pub async fn upload(&self, payload: UploadPayload) -> Result<Option<UploadReceipt>, MediaError> {
        if self.in_flight.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            tracing::warn!("Rejected upload of {}: another upload is in flight", payload.filename);
            return Err(MediaError::UploadInFlight);
        }

        let guard = InFlightGuard(&self.in_flight);
        let filename = payload.filename.clone();
        let result = self.api.upload_file(payload).await;
        drop(guard);

        if let Err(e) = &result {
            tracing::error!("Upload of {} failed: {}", filename, e);
        }

        let refreshed = self.store.refresh().await;
        let receipt = result?;
        refreshed?;
        Ok(receipt)
    }
}
