use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify, Semaphore};
use uuid::Uuid;

use crate::errors::{ApiOperation, MediaError};
use crate::models::{FileId, FileRecord, UploadPayload, UploadReceipt};
use crate::services::image_probe::ImageProbe;
use crate::services::media_api::MediaApi;

/// Backend double that keeps its file table in memory.
pub struct InMemoryMediaApi {
    files: Mutex<Vec<FileRecord>>,
    next_id: AtomicI64,
    list_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_upload: AtomicBool,
    fail_delete: AtomicBool,
    hold_uploads: AtomicBool,
    upload_gate: Semaphore,
    upload_started: Notify,
}

impl Default for InMemoryMediaApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMediaApi {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            list_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail_list: AtomicBool::new(false),
            fail_upload: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            hold_uploads: AtomicBool::new(false),
            upload_gate: Semaphore::new(0),
            upload_started: Notify::new(),
        }
    }

    /// Start with `records` already stored. Ids continue after the largest one.
    pub async fn with_files(records: Vec<FileRecord>) -> Self {
        let api = Self::new();
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        api.next_id.store(max_id + 1, Ordering::SeqCst);
        *api.files.lock().await = records;
        api
    }

    pub async fn files(&self) -> Vec<FileRecord> {
        self.files.lock().await.clone()
    }

    /// Replace the stored table, as if another client changed it.
    pub async fn set_files(&self, records: Vec<FileRecord>) {
        *self.files.lock().await = records;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upload(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Make each upload wait for a [`InMemoryMediaApi::release_upload`] permit
    /// until [`InMemoryMediaApi::release_uploads`] is called.
    pub fn hold_uploads(&self) {
        self.hold_uploads.store(true, Ordering::SeqCst);
    }

    pub fn release_upload(&self) {
        self.upload_gate.add_permits(1);
    }

    /// Stop holding uploads. Later uploads go straight through.
    pub fn release_uploads(&self) {
        self.hold_uploads.store(false, Ordering::SeqCst);
    }

    /// Resolves once an upload request has reached the backend.
    pub async fn upload_started(&self) {
        self.upload_started.notified().await;
    }

    fn injected(operation: ApiOperation) -> MediaError {
        MediaError::Status { operation, status: 500, body: "injected failure".to_string() }
    }
}

#[async_trait]
impl MediaApi for InMemoryMediaApi {
    async fn list_files(&self) -> Result<Vec<FileRecord>, MediaError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::injected(ApiOperation::List));
        }
        Ok(self.files.lock().await.clone())
    }

    async fn upload_file(&self, payload: UploadPayload) -> Result<Option<UploadReceipt>, MediaError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.upload_started.notify_one();

        if self.hold_uploads.load(Ordering::SeqCst) {
            if let Ok(permit) = self.upload_gate.acquire().await {
                permit.forget();
            }
        }

        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(Self::injected(ApiOperation::Upload));
        }

        let extension = payload.filename.rsplit('.').next().unwrap_or_default().to_string();
        let s3_key = format!("{}.{}", Uuid::new_v4(), extension);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let record = FileRecord {
            id,
            filename: payload.filename,
            s3_key: s3_key.clone(),
            file_type: Some(extension),
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        self.files.lock().await.push(record);

        Ok(Some(UploadReceipt { id, status: "Uploaded".to_string(), s3_key }))
    }

    async fn delete_file(&self, id: FileId) -> Result<(), MediaError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::injected(ApiOperation::Delete));
        }

        let mut files = self.files.lock().await;
        let before = files.len();
        files.retain(|r| r.id != id);
        if files.len() == before {
            return Err(MediaError::NotFound(id));
        }
        Ok(())
    }
}

/// Image probe that fails for a fixed set of URLs and records every call.
#[derive(Default)]
pub struct ScriptedImageProbe {
    failing: HashSet<String>,
    calls: std::sync::Mutex<Vec<String>>,
}

impl ScriptedImageProbe {
    pub fn failing<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { failing: urls.into_iter().map(Into::into).collect(), calls: std::sync::Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageProbe for ScriptedImageProbe {
    async fn load(&self, url: &str) -> bool {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        !self.failing.contains(url)
    }
}
