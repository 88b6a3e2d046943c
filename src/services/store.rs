use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::errors::MediaError;
use crate::models::FileRecord;
use crate::services::media_api::MediaApi;

/// Immutable list of records, in the order the backend returned them.
pub type Snapshot = Arc<Vec<FileRecord>>;

/// Client-side cache of the backend file list.
///
/// The snapshot is only ever replaced wholesale by [`FileListStore::refresh`].
/// Concurrent refreshes are not ordered: whichever response lands last wins.
pub struct FileListStore {
    api: Arc<dyn MediaApi>,
    snapshot: watch::Sender<Snapshot>,
    generation: AtomicU64,
}

impl FileListStore {
    pub fn new(api: Arc<dyn MediaApi>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { api, snapshot, generation: AtomicU64::new(0) }
    }

    /// Reload the full list and swap it in. On failure the previous snapshot stays.
    pub async fn refresh(&self) -> Result<usize, MediaError> {
        match self.api.list_files().await {
            Ok(records) => {
                let count = records.len();
                self.snapshot.send_replace(Arc::new(records));
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!("File list refreshed: {} records (generation {})", count, generation);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("File list refresh failed, keeping previous snapshot: {}", e);
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified on every successful refresh.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// Number of successful refreshes so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
