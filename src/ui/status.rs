use std::fmt;

use crate::errors::{ApiOperation, MediaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Transient message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    pub fn from_error(error: &MediaError) -> Self {
        let text = match error {
            MediaError::UploadInFlight => "An upload is already in progress, wait for it to finish".to_string(),
            MediaError::NotFound(id) => format!("File {} no longer exists", id),
            MediaError::Transport { operation, .. } => {
                format!("Could not reach the server to {}", action(*operation))
            }
            MediaError::Status { operation, status, .. } => {
                format!("Server refused to {} (HTTP {})", action(*operation), status)
            }
            MediaError::Decode { operation, .. } => {
                format!("Server sent an unreadable response while trying to {}", action(*operation))
            }
            MediaError::Io(e) => format!("Could not read the selected file: {}", e),
            MediaError::InvalidConfig(msg) => format!("Configuration error: {}", msg),
        };
        Self { kind: StatusKind::Error, text }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

fn action(operation: ApiOperation) -> &'static str {
    match operation {
        ApiOperation::List => "refresh the file list",
        ApiOperation::Upload => "upload the file",
        ApiOperation::Delete => "delete the file",
        ApiOperation::Health => "check the server",
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusKind::Info => write!(f, "{}", self.text),
            StatusKind::Error => write!(f, "error: {}", self.text),
        }
    }
}
