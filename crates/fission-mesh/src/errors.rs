use std::path::PathBuf;

/// Errors from mesh construction and STL I/O.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no triangles")]
    Empty,

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("STL data truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("malformed STL: {reason}")]
    Malformed { reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
