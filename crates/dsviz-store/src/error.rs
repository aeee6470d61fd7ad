use thiserror::Error;

use dsviz_trees::SnapshotError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("unsupported format version {0:?}")]
    UnsupportedVersion(String),
    #[error("timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}
