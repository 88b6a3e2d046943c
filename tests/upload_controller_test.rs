use anyhow::Result;
use cloudmedia_client::test_utils::InMemoryMediaApi;
use cloudmedia_client::{ApiOperation, FileListStore, MediaError, UploadController, UploadPayload};
use std::sync::Arc;
use std::time::Duration;

fn setup(api: Arc<InMemoryMediaApi>) -> (Arc<FileListStore>, Arc<UploadController>) {
    let store = Arc::new(FileListStore::new(api.clone()));
    let uploads = Arc::new(UploadController::new(api, store.clone()));
    (store, uploads)
}

#[tokio::test]
async fn test_upload_then_list_returns_the_new_record() -> Result<()> {
    let api = Arc::new(InMemoryMediaApi::new());
    let (store, uploads) = setup(api.clone());
    store.refresh().await?;
    assert!(store.snapshot().is_empty());

    let receipt = uploads.upload(UploadPayload::new("mountains.jpg", vec![0xFF, 0xD8])).await?;
    let receipt = receipt.expect("backend returns a receipt");

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, receipt.id);
    assert_eq!(snapshot[0].filename, "mountains.jpg");
    assert_eq!(snapshot[0].s3_key, receipt.s3_key);
    assert_eq!(api.upload_calls(), 1);
    assert!(!uploads.is_in_flight());
    Ok(())
}

#[tokio::test]
async fn test_second_upload_while_in_flight_is_rejected() -> Result<()> {
    let api = Arc::new(InMemoryMediaApi::new());
    api.hold_uploads();
    let (store, uploads) = setup(api.clone());

    let first = {
        let uploads = uploads.clone();
        tokio::spawn(async move { uploads.upload(UploadPayload::new("one.jpg", vec![1])).await })
    };
    api.upload_started().await;
    assert!(uploads.is_in_flight());

    let second = uploads.upload(UploadPayload::new("two.jpg", vec![2])).await;
    assert!(matches!(second, Err(MediaError::UploadInFlight)));
    assert_eq!(api.upload_calls(), 1, "rejected upload must not reach the backend");

    api.release_upload();
    first.await??;

    assert!(!uploads.is_in_flight());
    assert_eq!(api.upload_calls(), 1);
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot()[0].filename, "one.jpg");

    // The trigger is usable again once the first cycle completes
    api.release_uploads();
    tokio::time::timeout(Duration::from_secs(5), uploads.upload(UploadPayload::new("two.jpg", vec![2]))).await??;
    assert_eq!(api.upload_calls(), 2);
    assert_eq!(store.snapshot().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_still_refreshes_and_clears_flag() -> Result<()> {
    let api = Arc::new(InMemoryMediaApi::new());
    api.fail_upload(true);
    let (store, uploads) = setup(api.clone());

    let err = uploads.upload(UploadPayload::new("broken.jpg", vec![1])).await.unwrap_err();

    assert_eq!(err.operation(), Some(ApiOperation::Upload));
    assert_eq!(api.list_calls(), 1, "refresh runs after a failed upload");
    assert_eq!(store.generation(), 1);
    assert!(!uploads.is_in_flight());
    Ok(())
}

#[tokio::test]
async fn test_refresh_failure_after_upload_is_reported_as_list_error() -> Result<()> {
    let api = Arc::new(InMemoryMediaApi::new());
    let (store, uploads) = setup(api.clone());
    api.fail_list(true);

    let err = uploads.upload(UploadPayload::new("ok.jpg", vec![1])).await.unwrap_err();

    assert_eq!(err.operation(), Some(ApiOperation::List));
    assert_eq!(api.files().await.len(), 1, "the upload itself went through");
    assert!(store.snapshot().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_dropped_upload_releases_in_flight_flag() -> Result<()> {
    let api = Arc::new(InMemoryMediaApi::new());
    api.hold_uploads();
    let (_store, uploads) = setup(api.clone());

    let task = {
        let uploads = uploads.clone();
        tokio::spawn(async move { uploads.upload(UploadPayload::new("slow.jpg", vec![1])).await })
    };
    api.upload_started().await;
    assert!(uploads.is_in_flight());

    task.abort();
    let _ = task.await;
    assert!(!uploads.is_in_flight());
    Ok(())
}
