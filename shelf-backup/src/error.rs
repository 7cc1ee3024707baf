use std::path::Path;

/// Errors that can occur while reading or writing backup files.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Backup archive has no '{0}' entry")]
    MissingEntry(String),

    #[error("Invalid JSON in '{entry}': {source}")]
    Json {
        entry: String,
        source: serde_json::Error,
    },

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Invalid backup: {0}")]
    InvalidBackup(String),
}

impl BackupError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn invalid_backup(msg: impl Into<String>) -> Self {
        Self::InvalidBackup(msg.into())
    }
}
