use std::path::PathBuf;

use fission_kernel::KernelError;
use fission_mesh::MeshError;

/// Errors from enclosure generation and export.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
