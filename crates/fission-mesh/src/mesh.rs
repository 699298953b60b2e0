use std::collections::HashMap;

use crate::bounds::BoundingBox;
use crate::errors::MeshError;

/// Indexed triangle mesh. Triangles are wound counter-clockwise when seen
/// from outside the solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<[f64; 3]>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        for tri in &triangles {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Build an indexed mesh from a triangle soup, merging vertices whose
    /// coordinates are bitwise equal in single precision.
    pub fn from_soup(soup: &[[[f32; 3]; 3]]) -> Self {
        let mut index: HashMap<[u32; 3], u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut triangles = Vec::with_capacity(soup.len());
        for tri in soup {
            let mut ids = [0u32; 3];
            for (slot, p) in ids.iter_mut().zip(tri) {
                // -0.0 and 0.0 must weld together.
                let key = [
                    (p[0] + 0.0).to_bits(),
                    (p[1] + 0.0).to_bits(),
                    (p[2] + 0.0).to_bits(),
                ];
                *slot = *index.entry(key).or_insert_with(|| {
                    positions.push([p[0] as f64, p[1] as f64, p[2] as f64]);
                    (positions.len() - 1) as u32
                });
            }
            triangles.push(ids);
        }
        Self {
            positions,
            triangles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle(&self, i: usize) -> [[f64; 3]; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Unit normal of triangle `i`, or `None` for a degenerate triangle.
    pub fn face_normal(&self, i: usize) -> Option<[f64; 3]> {
        let [a, b, c] = self.triangle(i);
        let n = cross(sub(b, a), sub(c, a));
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        (len > 1e-12).then(|| [n[0] / len, n[1] / len, n[2] / len])
    }

    /// Bounds of the vertices referenced by triangles.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for tri in &self.triangles {
            for &i in tri {
                bb.expand_to_include(&self.positions[i as usize]);
            }
        }
        bb
    }

    /// Signed enclosed volume (divergence theorem). Positive for a closed
    /// mesh with outward-facing triangles.
    pub fn signed_volume(&self) -> f64 {
        let mut six_v = 0.0;
        for i in 0..self.triangles.len() {
            let [a, b, c] = self.triangle(i);
            six_v += dot(a, cross(b, c));
        }
        six_v / 6.0
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
