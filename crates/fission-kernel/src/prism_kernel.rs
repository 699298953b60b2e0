//! Production kernel over Z-extruded primitives.
//!
//! Construction only builds a shared CSG tree. The cell decomposition is
//! computed on the first query and cached on the solid, so chains of
//! booleans cost nothing until a volume, bound or mesh is asked for.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument};

use crate::arrangement::{evaluate, Evaluation};
use crate::config::KernelConfig;
use crate::csg::CsgNode;
use crate::primitives::Prism;
use crate::tessellation::tessellate;
use crate::traits::Kernel;
use crate::types::*;
use fission_mesh::{BoundingBox, TriangleMesh};

#[derive(Clone)]
pub struct PrismSolid {
    root: Arc<CsgNode>,
    tolerance: f64,
    evaluation: Arc<OnceLock<Evaluation>>,
}

impl PrismSolid {
    fn new(root: CsgNode, tolerance: f64) -> Self {
        Self {
            root: Arc::new(root),
            tolerance,
            evaluation: Arc::new(OnceLock::new()),
        }
    }

    fn evaluation(&self) -> &Evaluation {
        self.evaluation
            .get_or_init(|| evaluate(&self.root, self.tolerance))
    }

    /// Number of primitives in the solid's construction tree.
    pub fn primitive_count(&self) -> usize {
        self.root.prism_count()
    }
}

impl fmt::Debug for PrismSolid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrismSolid")
            .field("primitives", &self.primitive_count())
            .field("evaluated", &self.evaluation.get().is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrismKernel {
    config: KernelConfig,
}

impl PrismKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    fn solid(&self, node: CsgNode) -> PrismSolid {
        PrismSolid::new(node, self.config.weld_tolerance)
    }
}

impl Kernel for PrismKernel {
    type Solid = PrismSolid;

    fn make_box(&self, center: [f64; 3], size: [f64; 3]) -> Result<PrismSolid, KernelError> {
        let prism = Prism::cuboid(center, size)?;
        Ok(self.solid(CsgNode::Prism(prism)))
    }

    fn make_cylinder(
        &self,
        center: [f64; 3],
        radius: f64,
        height: f64,
    ) -> Result<PrismSolid, KernelError> {
        let prism = Prism::cylinder(center, radius, height, &self.config)?;
        Ok(self.solid(CsgNode::Prism(prism)))
    }

    fn boolean_union(&self, a: &PrismSolid, b: &PrismSolid) -> Result<PrismSolid, KernelError> {
        Ok(self.solid(CsgNode::Union(a.root.clone(), b.root.clone())))
    }

    fn boolean_subtract(
        &self,
        a: &PrismSolid,
        b: &PrismSolid,
    ) -> Result<PrismSolid, KernelError> {
        Ok(self.solid(CsgNode::Difference(a.root.clone(), b.root.clone())))
    }

    #[instrument(skip(self, solid))]
    fn split(&self, solid: &PrismSolid, z: f64, keep: SplitKeep) -> Result<PrismSolid, KernelError> {
        if !z.is_finite() {
            return Err(KernelError::SplitFailed {
                reason: format!("split plane must be finite, got z={z}"),
            });
        }
        let (z_min, z_max) = match keep {
            SplitKeep::Above => (z, f64::INFINITY),
            SplitKeep::Below => (f64::NEG_INFINITY, z),
        };
        debug!(z, ?keep, "clipping solid");
        Ok(self.solid(CsgNode::Clip {
            inner: solid.root.clone(),
            z_min,
            z_max,
        }))
    }

    fn volume(&self, solid: &PrismSolid) -> f64 {
        solid.evaluation().volume
    }

    fn bounding_box(&self, solid: &PrismSolid) -> BoundingBox {
        solid.evaluation().bounds
    }

    fn tessellate(&self, solid: &PrismSolid) -> Result<TriangleMesh, KernelError> {
        tessellate(solid.evaluation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_share_subtrees() {
        let k = PrismKernel::new();
        let a = k.make_box([0.0; 3], [2.0; 3]).unwrap();
        let b = k.make_cylinder([0.0; 3], 0.5, 3.0).unwrap();
        let c = k.boolean_subtract(&a, &b).unwrap();
        let d = k.boolean_union(&c, &a).unwrap();
        assert_eq!(d.primitive_count(), 3);
        match &*d.root {
            CsgNode::Union(left, _) => assert!(Arc::ptr_eq(left, &c.root)),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn evaluation_is_cached_per_solid() {
        let k = PrismKernel::new();
        let a = k.make_box([0.0; 3], [2.0; 3]).unwrap();
        assert!(a.evaluation.get().is_none());
        assert!((k.volume(&a) - 8.0).abs() < 1e-12);
        let copy = a.clone();
        assert!(copy.evaluation.get().is_some());
    }

    #[test]
    fn non_finite_split_is_rejected() {
        let k = PrismKernel::new();
        let a = k.make_box([0.0; 3], [2.0; 3]).unwrap();
        let err = k.split(&a, f64::NAN, SplitKeep::Above).unwrap_err();
        assert!(matches!(err, KernelError::SplitFailed { .. }));
    }

    #[test]
    fn invalid_primitives_surface_as_errors() {
        let k = PrismKernel::new();
        assert!(matches!(
            k.make_box([0.0; 3], [1.0, -1.0, 1.0]),
            Err(KernelError::InvalidPrimitive { .. })
        ));
        assert!(matches!(
            k.make_cylinder([0.0; 3], 0.0, 1.0),
            Err(KernelError::InvalidPrimitive { .. })
        ));
    }
}
