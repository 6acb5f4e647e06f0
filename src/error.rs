use std::path::PathBuf;
use thiserror::Error;

/// Result type for table and session mutations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors returned by schema and row mutations.
///
/// Every variant is reported before any state changes, so a failed call
/// leaves the table exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    // Validation errors
    #[error("{header} must not be empty")]
    EmptyCell { column: usize, header: String },

    #[error("row has {found} cells but the table has {expected} columns")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("the table has no columns")]
    NoColumns,

    #[error("every column needs a name before rows can be added")]
    IncompleteSchema,

    // Index errors
    #[error("column {index} is out of range (table has {len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("row {index} is out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

impl TableError {
    /// True for errors caused by user input rather than a bad index.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TableError::EmptyCell { .. }
                | TableError::ShapeMismatch { .. }
                | TableError::NoColumns
                | TableError::IncompleteSchema
        )
    }
}

/// Failures of the file-write and share collaborators used by export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to share export: {reason}")]
    Share { reason: String },
}

/// Problems loading a [`crate::session::SessionConfig`] file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
