//! Constructive solid geometry over prisms.

use std::sync::Arc;

use crate::primitives::Prism;

/// An immutable CSG expression. Subtrees are shared between solids.
#[derive(Debug)]
pub enum CsgNode {
    Prism(Prism),
    Union(Arc<CsgNode>, Arc<CsgNode>),
    Difference(Arc<CsgNode>, Arc<CsgNode>),
    /// Restrict to `z_min <= z <= z_max`; either bound may be infinite.
    Clip {
        inner: Arc<CsgNode>,
        z_min: f64,
        z_max: f64,
    },
}

impl CsgNode {
    /// Point membership for points off every boundary.
    pub fn contains(&self, p: [f64; 3]) -> bool {
        match self {
            CsgNode::Prism(prism) => prism.contains(p),
            CsgNode::Union(a, b) => a.contains(p) || b.contains(p),
            CsgNode::Difference(a, b) => a.contains(p) && !b.contains(p),
            CsgNode::Clip {
                inner,
                z_min,
                z_max,
            } => p[2] > *z_min && p[2] < *z_max && inner.contains(p),
        }
    }

    pub fn visit_prisms<'a>(&'a self, f: &mut impl FnMut(&'a Prism)) {
        match self {
            CsgNode::Prism(prism) => f(prism),
            CsgNode::Union(a, b) | CsgNode::Difference(a, b) => {
                a.visit_prisms(f);
                b.visit_prisms(f);
            }
            CsgNode::Clip { inner, .. } => inner.visit_prisms(f),
        }
    }

    /// Every horizontal plane where membership can change.
    pub fn z_planes(&self, out: &mut Vec<f64>) {
        match self {
            CsgNode::Prism(prism) => out.extend([prism.z_min, prism.z_max]),
            CsgNode::Union(a, b) | CsgNode::Difference(a, b) => {
                a.z_planes(out);
                b.z_planes(out);
            }
            CsgNode::Clip {
                inner,
                z_min,
                z_max,
            } => {
                out.extend([*z_min, *z_max].into_iter().filter(|z| z.is_finite()));
                inner.z_planes(out);
            }
        }
    }

    pub fn prism_count(&self) -> usize {
        let mut n = 0;
        self.visit_prisms(&mut |_| n += 1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: [f64; 3], side: f64) -> Arc<CsgNode> {
        Arc::new(CsgNode::Prism(
            Prism::cuboid(center, [side, side, side]).unwrap(),
        ))
    }

    #[test]
    fn membership_follows_operators() {
        let outer = cube([0.0, 0.0, 0.0], 4.0);
        let inner = cube([0.0, 0.0, 0.0], 2.0);
        let shell = CsgNode::Difference(outer.clone(), inner);
        assert!(shell.contains([1.5, 0.0, 0.0]));
        assert!(!shell.contains([0.0, 0.0, 0.0]));

        let clipped = CsgNode::Clip {
            inner: outer,
            z_min: 0.0,
            z_max: f64::INFINITY,
        };
        assert!(clipped.contains([0.0, 0.0, 1.0]));
        assert!(!clipped.contains([0.0, 0.0, -1.0]));
    }

    #[test]
    fn planes_include_finite_clip_bounds() {
        let node = CsgNode::Clip {
            inner: cube([0.0, 0.0, 0.0], 2.0),
            z_min: 0.25,
            z_max: f64::INFINITY,
        };
        let mut zs = Vec::new();
        node.z_planes(&mut zs);
        zs.sort_by(f64::total_cmp);
        assert_eq!(zs, vec![-1.0, 0.25, 1.0]);
        assert_eq!(node.prism_count(), 1);
    }
}
