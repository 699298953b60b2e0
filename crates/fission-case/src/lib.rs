//! Parametric enclosure generation from a board schema.
//!
//! [`CaseLayout`] derives every dimension and placement and is always
//! available. [`CaseGenerator`] turns a layout into a solid through any
//! [`fission_kernel::Kernel`] and needs the default `kernel` feature.

pub mod layout;

#[cfg(feature = "kernel")]
pub mod errors;
#[cfg(feature = "kernel")]
pub mod generator;

pub use layout::{CaseLayout, CaseParams, Cutout, MountPost};

#[cfg(feature = "kernel")]
pub use errors::CaseError;
#[cfg(feature = "kernel")]
pub use generator::{CaseGenerator, ExportBundle, BUNDLE_STEP_NAME, BUNDLE_STL_NAME};
