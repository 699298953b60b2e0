use crate::step::write_step;
use crate::types::*;
use fission_mesh::{BoundingBox, TriangleMesh};

/// Core geometry kernel trait: construction, booleans, and queries.
///
/// Solids are immutable values; every operation returns a new solid.
/// Implemented by `PrismKernel` and `MockKernel`.
pub trait Kernel {
    type Solid: Clone + std::fmt::Debug;

    /// Axis-aligned box of `size` (x, y, z) centred on `center`.
    fn make_box(&self, center: [f64; 3], size: [f64; 3]) -> Result<Self::Solid, KernelError>;

    /// Z-axis cylinder centred on `center`.
    fn make_cylinder(
        &self,
        center: [f64; 3],
        radius: f64,
        height: f64,
    ) -> Result<Self::Solid, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &self,
        a: &Self::Solid,
        b: &Self::Solid,
    ) -> Result<Self::Solid, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &self,
        a: &Self::Solid,
        b: &Self::Solid,
    ) -> Result<Self::Solid, KernelError>;

    /// Cut with the plane `Z = z` and keep one side.
    fn split(
        &self,
        solid: &Self::Solid,
        z: f64,
        keep: SplitKeep,
    ) -> Result<Self::Solid, KernelError>;

    fn volume(&self, solid: &Self::Solid) -> f64;

    fn bounding_box(&self, solid: &Self::Solid) -> BoundingBox;

    /// Closed, outward-wound triangle mesh of the solid's boundary.
    fn tessellate(&self, solid: &Self::Solid) -> Result<TriangleMesh, KernelError>;

    /// Faceted STEP (ISO 10303-21) text for the solid.
    fn export_step(&self, solid: &Self::Solid, name: &str) -> Result<String, KernelError> {
        let mesh = self.tessellate(solid)?;
        Ok(write_step(&mesh, name))
    }
}
