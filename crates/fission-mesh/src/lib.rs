//! Indexed triangle meshes: STL input/output and printability analysis.

pub mod analysis;
pub mod bounds;
pub mod errors;
pub mod mesh;
pub mod stl;

pub use analysis::{analyze, MeshAnalysis};
pub use bounds::BoundingBox;
pub use errors::MeshError;
pub use mesh::TriangleMesh;
pub use stl::{load_stl, read_stl, save_stl, write_ascii_stl, write_binary_stl};
