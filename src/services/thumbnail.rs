use crate::models::FileRecord;
use crate::services::image_probe::ImageProbe;

const THUMBNAIL_PREFIX: &str = "thumbnails/";

/// Where a record's image is in the thumbnail-then-original fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStage {
    /// Resolved but not yet handed to the renderer.
    Pending,
    ThumbnailShown,
    FallbackShown,
    /// Both candidates failed. Terminal for this render.
    Broken,
}

/// Two-candidate image source for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    thumbnail_url: String,
    original_url: String,
    stage: ImageStage,
}

impl ImageSource {
    pub fn stage(&self) -> ImageStage {
        self.stage
    }

    /// URL the renderer should currently display.
    pub fn src(&self) -> &str {
        match self.stage {
            ImageStage::Pending | ImageStage::ThumbnailShown => &self.thumbnail_url,
            ImageStage::FallbackShown | ImageStage::Broken => &self.original_url,
        }
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn is_broken(&self) -> bool {
        self.stage == ImageStage::Broken
    }

    /// The renderer started displaying the first candidate.
    pub fn show(&mut self) {
        if self.stage == ImageStage::Pending {
            self.stage = ImageStage::ThumbnailShown;
        }
    }

    /// The current candidate failed to load; move to the next one, if any.
    pub fn on_load_error(&mut self) -> ImageStage {
        self.stage = match self.stage {
            ImageStage::Pending | ImageStage::ThumbnailShown => ImageStage::FallbackShown,
            ImageStage::FallbackShown | ImageStage::Broken => ImageStage::Broken,
        };
        self.stage
    }
}

/// Derives thumbnail and original object URLs from a record's storage key.
#[derive(Debug, Clone)]
pub struct ThumbnailResolver {
    bucket_root: String,
}

impl ThumbnailResolver {
    pub fn new(bucket_root: impl Into<String>) -> Self {
        let bucket_root = bucket_root.into().trim_end_matches('/').to_string();
        Self { bucket_root }
    }

    pub fn bucket_root(&self) -> &str {
        &self.bucket_root
    }

    pub fn thumbnail_url(&self, record: &FileRecord) -> String {
        format!("{}/{}{}", self.bucket_root, THUMBNAIL_PREFIX, record.s3_key)
    }

    pub fn original_url(&self, record: &FileRecord) -> String {
        format!("{}/{}", self.bucket_root, record.s3_key)
    }

    /// Fresh source for `record`, thumbnail first. Nothing is remembered between calls.
    pub fn resolve_image_source(&self, record: &FileRecord) -> ImageSource {
        ImageSource {
            thumbnail_url: self.thumbnail_url(record),
            original_url: self.original_url(record),
            stage: ImageStage::Pending,
        }
    }

    /// Run the fallback against `probe` until a candidate loads or both fail.
    /// The probe is called at most twice.
    pub async fn settle(&self, record: &FileRecord, probe: &dyn ImageProbe) -> ImageSource {
        let mut source = self.resolve_image_source(record);
        source.show();

        while !source.is_broken() {
            if probe.load(source.src()).await {
                break;
            }
            if source.on_load_error() == ImageStage::Broken {
                tracing::debug!("No displayable image for file {} ({})", record.id, record.s3_key);
            }
        }

        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::image_probe::AssumeLoaded;

    #[test]
    fn test_stage_transitions_stop_at_broken() {
        let resolver = ThumbnailResolver::new("https://bucket.example/");
        let mut source = resolver.resolve_image_source(&FileRecord::new(1, "a.jpg", "a.jpg"));

        assert_eq!(source.stage(), ImageStage::Pending);
        assert_eq!(source.src(), "https://bucket.example/thumbnails/a.jpg");

        source.show();
        assert_eq!(source.stage(), ImageStage::ThumbnailShown);
        source.show();
        assert_eq!(source.stage(), ImageStage::ThumbnailShown);

        assert_eq!(source.on_load_error(), ImageStage::FallbackShown);
        assert_eq!(source.src(), "https://bucket.example/a.jpg");

        assert_eq!(source.on_load_error(), ImageStage::Broken);
        assert_eq!(source.on_load_error(), ImageStage::Broken);
        assert_eq!(source.src(), "https://bucket.example/a.jpg");
    }

    #[test]
    fn test_load_error_before_show_falls_back() {
        let resolver = ThumbnailResolver::new("https://bucket.example");
        let mut source = resolver.resolve_image_source(&FileRecord::new(1, "a.jpg", "a.jpg"));
        assert_eq!(source.on_load_error(), ImageStage::FallbackShown);
    }

    #[test]
    fn test_settle_without_probing_keeps_thumbnail() {
        let resolver = ThumbnailResolver::new("https://bucket.example");
        let record = FileRecord::new(1, "a.jpg", "a.jpg");
        let source = tokio_test::block_on(resolver.settle(&record, &AssumeLoaded));
        assert_eq!(source.stage(), ImageStage::ThumbnailShown);
        assert_eq!(source.src(), "https://bucket.example/thumbnails/a.jpg");
    }
}
