use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::errors::{ApiOperation, MediaError};
use crate::models::{ApiStatus, FileId, FileRecord, UploadPayload, UploadReceipt};

/// Multipart field the backend reads the uploaded file from.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// The three backend calls the client synchronises through.
#[async_trait]
pub trait MediaApi: Send + Sync {
    /// `GET /files/`, in backend order.
    async fn list_files(&self) -> Result<Vec<FileRecord>, MediaError>;

    /// `POST /upload/`. The receipt is `None` when the backend sent no usable body.
    async fn upload_file(&self, payload: UploadPayload) -> Result<Option<UploadReceipt>, MediaError>;

    /// `DELETE /files/{id}`.
    async fn delete_file(&self, id: FileId) -> Result<(), MediaError>;
}

#[derive(Debug, Clone)]
pub struct HttpMediaApi {
    client: Client,
    base_url: String,
}

impl HttpMediaApi {
    pub fn new(config: &ApiConfig) -> Result<Self, MediaError> {
        let mut builder = Client::builder()
            .user_agent(concat!("cloudmedia-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs));

        if config.accept_invalid_certs {
            tracing::warn!("Media API client configured to accept invalid certificates (CLOUDMEDIA_ACCEPT_INVALID_CERTS=true)");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| MediaError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`, a liveness check for the backend.
    pub async fn health(&self) -> Result<ApiStatus, MediaError> {
        let url = self.url("/");
        tracing::debug!("Making media API request to: {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| MediaError::Transport { operation: ApiOperation::Health, source })?;
        let response = check_status(ApiOperation::Health, &url, response).await?;
        response.json().await.map_err(|source| MediaError::Decode { operation: ApiOperation::Health, source })
    }
}

/// Turn a non-success response into `MediaError::Status`, logging the body.
async fn check_status(operation: ApiOperation, url: &str, response: Response) -> Result<Response, MediaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("Media API request failed - URL: {}, Status: {}, Body: {}", url, status, body);
    Err(MediaError::Status { operation, status: status.as_u16(), body })
}

#[async_trait]
impl MediaApi for HttpMediaApi {
    async fn list_files(&self) -> Result<Vec<FileRecord>, MediaError> {
        let url = self.url("/files/");
        tracing::debug!("Making media API request to: {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| MediaError::Transport { operation: ApiOperation::List, source })?;

        let response = check_status(ApiOperation::List, &url, response).await?;
        response.json().await.map_err(|source| MediaError::Decode { operation: ApiOperation::List, source })
    }

    async fn upload_file(&self, payload: UploadPayload) -> Result<Option<UploadReceipt>, MediaError> {
        let url = self.url("/upload/");
        let size = payload.len();
        let filename = payload.filename.clone();

        let part = Part::bytes(payload.bytes)
            .file_name(payload.filename)
            .mime_str(&payload.content_type)
            .map_err(|source| MediaError::Transport { operation: ApiOperation::Upload, source })?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        tracing::debug!("Uploading {} ({} bytes) to: {}", filename, size, url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| MediaError::Transport { operation: ApiOperation::Upload, source })?;

        let response = check_status(ApiOperation::Upload, &url, response).await?;

        // The refresh that follows is authoritative, so an odd body is only worth a log line.
        match response.json::<UploadReceipt>().await {
            Ok(receipt) => {
                tracing::info!("Uploaded {} as {} (id {})", filename, receipt.s3_key, receipt.id);
                Ok(Some(receipt))
            }
            Err(e) => {
                tracing::debug!("Upload of {} returned no usable receipt: {}", filename, e);
                Ok(None)
            }
        }
    }

    async fn delete_file(&self, id: FileId) -> Result<(), MediaError> {
        let url = self.url(&format!("/files/{}", id));
        tracing::debug!("Making media API request to: DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|source| MediaError::Transport { operation: ApiOperation::Delete, source })?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!("File {} was already gone on the backend", id);
            return Err(MediaError::NotFound(id));
        }

        check_status(ApiOperation::Delete, &url, response).await?;
        tracing::info!("Deleted file {}", id);
        Ok(())
    }
}
