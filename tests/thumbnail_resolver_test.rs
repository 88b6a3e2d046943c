use cloudmedia_client::services::{ImageStage, ThumbnailResolver};
use cloudmedia_client::test_utils::ScriptedImageProbe;
use cloudmedia_client::FileRecord;

const BUCKET: &str = "https://storage.example.net/media-bucket";

fn abc() -> FileRecord {
    FileRecord::new(1, "abc original name.jpg", "abc.jpg")
}

#[test]
fn test_thumbnail_url_is_first_candidate() {
    let resolver = ThumbnailResolver::new(BUCKET);
    let source = resolver.resolve_image_source(&abc());

    assert_eq!(source.src(), format!("{BUCKET}/thumbnails/abc.jpg"));
    assert_eq!(source.thumbnail_url(), format!("{BUCKET}/thumbnails/abc.jpg"));
    assert_eq!(source.original_url(), format!("{BUCKET}/abc.jpg"));
    assert_eq!(source.stage(), ImageStage::Pending);
}

#[test]
fn test_bucket_root_trailing_slash_does_not_double() {
    let resolver = ThumbnailResolver::new(format!("{BUCKET}/"));
    assert_eq!(resolver.thumbnail_url(&abc()), format!("{BUCKET}/thumbnails/abc.jpg"));
    assert_eq!(resolver.original_url(&abc()), format!("{BUCKET}/abc.jpg"));
}

#[tokio::test]
async fn test_loaded_thumbnail_needs_one_probe() {
    let resolver = ThumbnailResolver::new(BUCKET);
    let probe = ScriptedImageProbe::failing(Vec::<String>::new());

    let source = resolver.settle(&abc(), &probe).await;

    assert_eq!(source.stage(), ImageStage::ThumbnailShown);
    assert_eq!(source.src(), format!("{BUCKET}/thumbnails/abc.jpg"));
    assert_eq!(probe.calls(), vec![format!("{BUCKET}/thumbnails/abc.jpg")]);
}

#[tokio::test]
async fn test_missing_thumbnail_falls_back_to_original() {
    let resolver = ThumbnailResolver::new(BUCKET);
    let probe = ScriptedImageProbe::failing([format!("{BUCKET}/thumbnails/abc.jpg")]);

    let source = resolver.settle(&abc(), &probe).await;

    assert_eq!(source.stage(), ImageStage::FallbackShown);
    assert_eq!(source.src(), format!("{BUCKET}/abc.jpg"));
    assert_eq!(probe.calls().len(), 2);
}

#[tokio::test]
async fn test_both_candidates_failing_is_terminal_after_two_attempts() {
    let resolver = ThumbnailResolver::new(BUCKET);
    let probe = ScriptedImageProbe::failing([format!("{BUCKET}/thumbnails/abc.jpg"), format!("{BUCKET}/abc.jpg")]);

    let mut source = resolver.settle(&abc(), &probe).await;

    assert!(source.is_broken());
    assert_eq!(probe.calls(), vec![format!("{BUCKET}/thumbnails/abc.jpg"), format!("{BUCKET}/abc.jpg")]);

    // Further failures do not produce new candidates
    assert_eq!(source.on_load_error(), ImageStage::Broken);
    assert_eq!(source.src(), format!("{BUCKET}/abc.jpg"));
}

#[tokio::test]
async fn test_every_render_starts_from_the_thumbnail_again() {
    let resolver = ThumbnailResolver::new(BUCKET);
    let probe = ScriptedImageProbe::failing([format!("{BUCKET}/thumbnails/abc.jpg")]);

    let first = resolver.settle(&abc(), &probe).await;
    let second = resolver.settle(&abc(), &probe).await;

    assert_eq!(first, second);
    assert_eq!(
        probe.calls(),
        vec![
            format!("{BUCKET}/thumbnails/abc.jpg"),
            format!("{BUCKET}/abc.jpg"),
            format!("{BUCKET}/thumbnails/abc.jpg"),
            format!("{BUCKET}/abc.jpg"),
        ]
    );
    assert_eq!(resolver.resolve_image_source(&abc()).stage(), ImageStage::Pending);
}
