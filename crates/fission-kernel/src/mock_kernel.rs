//! MockKernel: deterministic test double implementing [`Kernel`].
//!
//! Solids carry only an analytic volume estimate and an axis-aligned bound,
//! so results are predictable without any real geometry. The kernel can be
//! told to fail on the n-th boolean to exercise error propagation in
//! callers.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::traits::Kernel;
use crate::types::*;
use fission_mesh::{BoundingBox, TriangleMesh};

/// A synthetic solid: volume, bound, and how many kernel operations built it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSolid {
    pub volume: f64,
    pub bounds: BoundingBox,
    pub operations: usize,
}

/// Deterministic test double for the geometry kernel.
#[derive(Debug, Default)]
pub struct MockKernel {
    booleans: AtomicUsize,
    fail_at: Option<usize>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A kernel whose `n`-th boolean (1-based) returns `BooleanFailed`.
    pub fn failing_at(n: usize) -> Self {
        Self {
            booleans: AtomicUsize::new(0),
            fail_at: Some(n),
        }
    }

    /// Booleans attempted so far, including a failed one.
    pub fn boolean_count(&self) -> usize {
        self.booleans.load(Ordering::SeqCst)
    }

    fn next_boolean(&self, what: &str) -> Result<(), KernelError> {
        let n = self.booleans.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(n) {
            return Err(KernelError::BooleanFailed {
                reason: format!("mock {what} #{n} configured to fail"),
            });
        }
        Ok(())
    }
}

fn box_volume(bb: &BoundingBox) -> f64 {
    let [x, y, z] = bb.size();
    x * y * z
}

fn intersection(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
    if a.is_empty() || b.is_empty() {
        return BoundingBox::empty();
    }
    let min = [
        a.min[0].max(b.min[0]),
        a.min[1].max(b.min[1]),
        a.min[2].max(b.min[2]),
    ];
    let max = [
        a.max[0].min(b.max[0]),
        a.max[1].min(b.max[1]),
        a.max[2].min(b.max[2]),
    ];
    if (0..3).any(|i| min[i] >= max[i]) {
        BoundingBox::empty()
    } else {
        BoundingBox::new(min, max)
    }
}

impl Kernel for MockKernel {
    type Solid = MockSolid;

    fn make_box(&self, center: [f64; 3], size: [f64; 3]) -> Result<MockSolid, KernelError> {
        if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(KernelError::InvalidPrimitive {
                reason: format!("box size must be positive, got {size:?}"),
            });
        }
        let half = size.map(|s| s / 2.0);
        Ok(MockSolid {
            volume: size[0] * size[1] * size[2],
            bounds: BoundingBox::new(
                [center[0] - half[0], center[1] - half[1], center[2] - half[2]],
                [center[0] + half[0], center[1] + half[1], center[2] + half[2]],
            ),
            operations: 1,
        })
    }

    fn make_cylinder(
        &self,
        center: [f64; 3],
        radius: f64,
        height: f64,
    ) -> Result<MockSolid, KernelError> {
        if !(radius > 0.0 && height > 0.0) {
            return Err(KernelError::InvalidPrimitive {
                reason: format!("cylinder radius and height must be positive, got r={radius} h={height}"),
            });
        }
        Ok(MockSolid {
            volume: PI * radius * radius * height,
            bounds: BoundingBox::new(
                [center[0] - radius, center[1] - radius, center[2] - height / 2.0],
                [center[0] + radius, center[1] + radius, center[2] + height / 2.0],
            ),
            operations: 1,
        })
    }

    /// Volumes add; overlap is ignored.
    fn boolean_union(&self, a: &MockSolid, b: &MockSolid) -> Result<MockSolid, KernelError> {
        self.next_boolean("union")?;
        Ok(MockSolid {
            volume: a.volume + b.volume,
            bounds: a.bounds.union(&b.bounds),
            operations: a.operations + b.operations + 1,
        })
    }

    /// Removes the share of `b` whose bound overlaps `a`'s bound.
    fn boolean_subtract(&self, a: &MockSolid, b: &MockSolid) -> Result<MockSolid, KernelError> {
        self.next_boolean("subtract")?;
        let b_box = box_volume(&b.bounds);
        let fraction = if b_box > 0.0 {
            box_volume(&intersection(&a.bounds, &b.bounds)) / b_box
        } else {
            0.0
        };
        Ok(MockSolid {
            volume: (a.volume - b.volume * fraction).max(0.0),
            bounds: a.bounds,
            operations: a.operations + b.operations + 1,
        })
    }

    /// Keeps the share of volume proportional to the kept height.
    fn split(&self, solid: &MockSolid, z: f64, keep: SplitKeep) -> Result<MockSolid, KernelError> {
        if !z.is_finite() {
            return Err(KernelError::SplitFailed {
                reason: format!("split plane must be finite, got z={z}"),
            });
        }
        let height = solid.bounds.size()[2];
        let mut bounds = solid.bounds;
        match keep {
            SplitKeep::Above => bounds.min[2] = bounds.min[2].max(z),
            SplitKeep::Below => bounds.max[2] = bounds.max[2].min(z),
        }
        let kept = (bounds.max[2] - bounds.min[2]).max(0.0);
        let (volume, bounds) = if kept > 0.0 && height > 0.0 {
            (solid.volume * kept / height, bounds)
        } else {
            (0.0, BoundingBox::empty())
        };
        Ok(MockSolid {
            volume,
            bounds,
            operations: solid.operations + 1,
        })
    }

    fn volume(&self, solid: &MockSolid) -> f64 {
        solid.volume
    }

    fn bounding_box(&self, solid: &MockSolid) -> BoundingBox {
        solid.bounds
    }

    /// The solid's bounding box as a closed 12-triangle mesh.
    fn tessellate(&self, solid: &MockSolid) -> Result<TriangleMesh, KernelError> {
        if solid.bounds.is_empty() {
            return Err(KernelError::TessellationFailed {
                reason: "mock solid is empty".to_string(),
            });
        }
        let ([x0, y0, z0], [x1, y1, z1]) = (solid.bounds.min, solid.bounds.max);
        let positions = vec![
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y1, z0],
            [x0, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x1, y1, z1],
            [x0, y1, z1],
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        TriangleMesh::new(positions, triangles).map_err(|e| KernelError::TessellationFailed {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytic_volumes() {
        let k = MockKernel::new();
        let a = k.make_box([0.0; 3], [2.0, 3.0, 4.0]).unwrap();
        assert_eq!(a.volume, 24.0);
        let c = k.make_cylinder([0.0; 3], 1.0, 2.0).unwrap();
        assert!((c.volume - 2.0 * PI).abs() < 1e-12);

        let u = k.boolean_union(&a, &c).unwrap();
        assert!((u.volume - (24.0 + 2.0 * PI)).abs() < 1e-12);
        assert_eq!(u.operations, 3);
    }

    #[test]
    fn subtract_counts_only_overlap() {
        let k = MockKernel::new();
        let a = k.make_box([0.0; 3], [2.0; 3]).unwrap();
        // Half of the cutter lies outside `a`.
        let b = k.make_box([1.0, 0.0, 0.0], [2.0; 3]).unwrap();
        let d = k.boolean_subtract(&a, &b).unwrap();
        assert!((d.volume - 4.0).abs() < 1e-12);
        assert_eq!(d.bounds, a.bounds);

        let far = k.make_box([10.0, 0.0, 0.0], [1.0; 3]).unwrap();
        assert_eq!(k.boolean_subtract(&a, &far).unwrap().volume, 8.0);
    }

    #[test]
    fn split_is_proportional() {
        let k = MockKernel::new();
        let a = k.make_box([0.0, 0.0, 2.0], [2.0, 2.0, 4.0]).unwrap();
        let top = k.split(&a, 3.0, SplitKeep::Above).unwrap();
        let bottom = k.split(&a, 3.0, SplitKeep::Below).unwrap();
        assert!((top.volume - 4.0).abs() < 1e-12);
        assert!((bottom.volume - 12.0).abs() < 1e-12);
        assert_eq!(top.bounds.min[2], 3.0);

        let none = k.split(&a, 10.0, SplitKeep::Above).unwrap();
        assert_eq!(none.volume, 0.0);
        assert!(k.tessellate(&none).is_err());
    }

    #[test]
    fn fails_on_configured_boolean() {
        let k = MockKernel::failing_at(2);
        let a = k.make_box([0.0; 3], [1.0; 3]).unwrap();
        assert!(k.boolean_union(&a, &a).is_ok());
        let err = k.boolean_subtract(&a, &a).unwrap_err();
        assert!(matches!(err, KernelError::BooleanFailed { .. }));
        assert!(k.boolean_union(&a, &a).is_ok());
        assert_eq!(k.boolean_count(), 3);
    }

    #[test]
    fn tessellation_is_bounding_box() {
        let k = MockKernel::new();
        let a = k.make_box([0.0; 3], [2.0, 4.0, 6.0]).unwrap();
        let mesh = k.tessellate(&a).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.signed_volume() - 48.0).abs() < 1e-9);
    }
}
