use thiserror::Error;

use shelf_backup::BackupError;
use shelf_core::{MigrateError, SettingsError};

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing a backup failed
    #[error("{0}")]
    Backup(#[from] BackupError),

    /// The migration hit an invariant violation
    #[error("{0}")]
    Migrate(#[from] MigrateError),

    /// Settings file could not be loaded
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// Logger could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// Invalid combination of arguments
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }
}
