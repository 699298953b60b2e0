//! Solid modelling for enclosure generation.
//!
//! [`Kernel`] is the construction interface the case generator programs
//! against. [`PrismKernel`] is the production implementation: every
//! primitive is a Z-extruded footprint, so booleans, splits, volumes and
//! meshes are evaluated exactly on a cell decomposition instead of through
//! general surface intersection. [`MockKernel`] is a deterministic double
//! for exercising failure paths.

pub mod arrangement;
pub mod config;
pub mod csg;
pub mod mock_kernel;
pub mod primitives;
pub mod prism_kernel;
pub mod step;
pub mod tessellation;
pub mod traits;
pub mod types;

pub use config::KernelConfig;
pub use fission_mesh::{BoundingBox, TriangleMesh};
pub use mock_kernel::{MockKernel, MockSolid};
pub use prism_kernel::{PrismKernel, PrismSolid};
pub use step::write_step;
pub use traits::Kernel;
pub use types::*;
