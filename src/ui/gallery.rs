use futures::future::join_all;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::models::{FileId, FileRecord};
use crate::services::image_probe::ImageProbe;
use crate::services::store::Snapshot;
use crate::services::thumbnail::{ImageSource, ThumbnailResolver};
use crate::ui::text::truncate;

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub id: FileId,
    pub label: String,
    pub image: ImageSource,
}

impl GalleryCard {
    pub fn render_line(&self) -> String {
        if self.image.is_broken() {
            format!("[#{}] {} (image unavailable)", self.id, self.label)
        } else {
            format!("[#{}] {} {}", self.id, self.label, self.image.src())
        }
    }
}

/// Turns store snapshots into cards. Image state is rebuilt on every render.
#[derive(Debug, Clone)]
pub struct GalleryView {
    resolver: ThumbnailResolver,
    filename_max_length: usize,
}

impl GalleryView {
    pub fn new(resolver: ThumbnailResolver, filename_max_length: usize) -> Self {
        Self { resolver, filename_max_length }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ThumbnailResolver::new(config.storage.bucket_root.clone()), config.ui.filename_max_length)
    }

    pub fn resolver(&self) -> &ThumbnailResolver {
        &self.resolver
    }

    /// Cards with unresolved images, in snapshot order.
    pub fn cards(&self, records: &[FileRecord]) -> Vec<GalleryCard> {
        records
            .iter()
            .map(|record| GalleryCard {
                id: record.id,
                label: truncate(&record.filename, self.filename_max_length),
                image: self.resolver.resolve_image_source(record),
            })
            .collect()
    }

    /// Cards with every image settled against `probe`.
    pub async fn render(&self, records: &[FileRecord], probe: &dyn ImageProbe) -> Vec<GalleryCard> {
        let images = join_all(records.iter().map(|record| self.resolver.settle(record, probe))).await;

        records
            .iter()
            .zip(images)
            .map(|(record, image)| GalleryCard {
                id: record.id,
                label: truncate(&record.filename, self.filename_max_length),
                image,
            })
            .collect()
    }

    pub fn render_lines(cards: &[GalleryCard]) -> Vec<String> {
        if cards.is_empty() {
            return vec!["(no files yet)".to_string()];
        }
        cards.iter().map(GalleryCard::render_line).collect()
    }
}

/// Wait for the next published snapshot. `None` once the store is gone.
pub async fn next_snapshot(receiver: &mut watch::Receiver<Snapshot>) -> Option<Snapshot> {
    receiver.changed().await.ok()?;
    let snapshot = receiver.borrow_and_update().clone();
    Some(snapshot)
}

pub fn upload_button_label(in_flight: bool) -> &'static str {
    if in_flight {
        "Uploading..."
    } else {
        "Upload new photo"
    }
}
