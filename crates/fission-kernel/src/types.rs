/// Which side of a horizontal split plane to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKeep {
    /// Material with `z >= plane`.
    Above,
    /// Material with `z <= plane`.
    Below,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("invalid primitive: {reason}")]
    InvalidPrimitive { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("split failed: {reason}")]
    SplitFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },
}
