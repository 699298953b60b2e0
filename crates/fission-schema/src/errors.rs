use std::path::PathBuf;

/// A value that the schema refuses to hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("expected a finite value greater than zero, got {value}")]
    NotPositive { value: f64 },

    #[error("expected a finite value of at least zero, got {value}")]
    Negative { value: f64 },

    #[error("expected a finite coordinate, got {value}")]
    NotFinite { value: f64 },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Errors while reading a schema document. Raised before any geometry work.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: {0} (expected a .json schema)")]
    UnsupportedFormat(String),

    #[error("failed to parse schema: {0}")]
    Parse(String),

    #[error("schema version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: String,
        supported_version: String,
    },

    #[error("invalid schema version: {0:?}")]
    InvalidVersion(String),
}

/// Errors while writing a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
