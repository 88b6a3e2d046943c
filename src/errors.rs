use std::fmt;
use thiserror::Error;

use crate::models::FileId;

/// Backend call that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    List,
    Upload,
    Delete,
    Health,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiOperation::List => "list",
            ApiOperation::Upload => "upload",
            ApiOperation::Delete => "delete",
            ApiOperation::Health => "health",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: ApiOperation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} request returned HTTP {status}: {body}")]
    Status { operation: ApiOperation, status: u16, body: String },
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: ApiOperation,
        #[source]
        source: reqwest::Error,
    },
    #[error("File {0} not found")]
    NotFound(FileId),
    #[error("An upload is already in progress")]
    UploadInFlight,
    #[error("Failed to read upload payload: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MediaError {
    /// Backend call this error belongs to, if it came from one.
    pub fn operation(&self) -> Option<ApiOperation> {
        match self {
            MediaError::Transport { operation, .. }
            | MediaError::Status { operation, .. }
            | MediaError::Decode { operation, .. } => Some(*operation),
            MediaError::NotFound(_) => Some(ApiOperation::Delete),
            MediaError::UploadInFlight | MediaError::Io(_) => Some(ApiOperation::Upload),
            MediaError::InvalidConfig(_) => None,
        }
    }

    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, MediaError::Transport { .. })
    }
}
