use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type FileId = i64;

/// One uploaded media item as the backend reports it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: FileId,
    pub filename: String,
    pub s3_key: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl FileRecord {
    pub fn new(id: FileId, filename: impl Into<String>, s3_key: impl Into<String>) -> Self {
        Self { id, filename: filename.into(), s3_key: s3_key.into(), file_type: None, created_at: None }
    }
}

/// Body of a successful `POST /upload/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub id: FileId,
    pub status: String,
    pub s3_key: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiStatus {
    pub message: String,
    #[serde(default)]
    pub docs: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_decodes_backend_row() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 3,
            "filename": "holiday.jpg",
            "s3_key": "0f8e.jpg",
            "file_type": "jpg",
            "created_at": "2026-01-12T08:30:00.123456"
        }))
        .unwrap();

        assert_eq!(record.id, 3);
        assert_eq!(record.s3_key, "0f8e.jpg");
        assert_eq!(record.file_type.as_deref(), Some("jpg"));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_record_tolerates_minimal_shape() {
        let record: FileRecord =
            serde_json::from_value(json!({"id": 1, "filename": "a.png", "s3_key": "k.png", "extra": true})).unwrap();
        assert_eq!(record, FileRecord::new(1, "a.png", "k.png"));
    }
}
