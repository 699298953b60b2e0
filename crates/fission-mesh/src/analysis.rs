//! Printability analysis of a welded triangle mesh.
//!
//! Edges are matched by vertex index, so the mesh must already be welded
//! (meshes from [`crate::read_stl`] and from the kernel are).

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::bounds::BoundingBox;
use crate::mesh::TriangleMesh;

/// Edge-topology and mass properties of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAnalysis {
    pub triangles: usize,
    pub vertices: usize,
    /// Undirected edges used by exactly one triangle.
    pub boundary_edges: usize,
    /// Undirected edges used by more than two triangles.
    pub non_manifold_edges: usize,
    /// Edges traversed twice in the same direction.
    pub misoriented_edges: usize,
    /// Triangles with (near) zero area.
    pub degenerate_triangles: usize,
    pub volume: f64,
    pub bounds: BoundingBox,
}

impl MeshAnalysis {
    /// Closed two-manifold surface: every edge borders exactly two triangles.
    pub fn is_watertight(&self) -> bool {
        self.triangles > 0 && self.boundary_edges == 0 && self.non_manifold_edges == 0
    }

    /// Adjacent triangles agree on orientation.
    pub fn is_winding_consistent(&self) -> bool {
        self.triangles > 0 && self.misoriented_edges == 0
    }
}

#[derive(Default)]
struct EdgeUse {
    forward: usize,
    backward: usize,
}

#[instrument(skip(mesh), fields(triangles = mesh.triangle_count()))]
pub fn analyze(mesh: &TriangleMesh) -> MeshAnalysis {
    let mut edges: HashMap<(u32, u32), EdgeUse> = HashMap::new();
    let mut degenerate = 0usize;

    for (i, tri) in mesh.triangles.iter().enumerate() {
        if mesh.face_normal(i).is_none() {
            degenerate += 1;
        }
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            if a == b {
                continue;
            }
            let entry = edges.entry((a.min(b), a.max(b))).or_default();
            if a < b {
                entry.forward += 1;
            } else {
                entry.backward += 1;
            }
        }
    }

    let mut boundary = 0usize;
    let mut non_manifold = 0usize;
    let mut misoriented = 0usize;
    for use_ in edges.values() {
        match use_.forward + use_.backward {
            1 => boundary += 1,
            2 => {}
            _ => non_manifold += 1,
        }
        if use_.forward > 1 || use_.backward > 1 {
            misoriented += 1;
        }
    }

    let analysis = MeshAnalysis {
        triangles: mesh.triangle_count(),
        vertices: mesh.vertex_count(),
        boundary_edges: boundary,
        non_manifold_edges: non_manifold,
        misoriented_edges: misoriented,
        degenerate_triangles: degenerate,
        volume: mesh.signed_volume(),
        bounds: mesh.bounding_box(),
    };
    info!(
        edges = edges.len(),
        boundary,
        non_manifold,
        misoriented,
        volume = analysis.volume,
        "mesh analysis complete"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::unit_cube;

    #[test]
    fn closed_cube_is_watertight_and_consistent() {
        let a = analyze(&unit_cube());
        assert!(a.is_watertight());
        assert!(a.is_winding_consistent());
        assert_eq!(a.degenerate_triangles, 0);
        assert!((a.volume - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_face_opens_the_mesh() {
        let mut cube = unit_cube();
        cube.triangles.truncate(10);
        let a = analyze(&cube);
        assert!(!a.is_watertight());
        assert_eq!(a.boundary_edges, 4);
    }

    #[test]
    fn flipped_triangle_breaks_winding() {
        let mut cube = unit_cube();
        cube.triangles[3].swap(1, 2);
        let a = analyze(&cube);
        assert!(a.is_watertight());
        assert!(!a.is_winding_consistent());
    }

    #[test]
    fn inverted_mesh_has_negative_volume() {
        let mut cube = unit_cube();
        for t in &mut cube.triangles {
            t.swap(1, 2);
        }
        let a = analyze(&cube);
        assert!(a.is_winding_consistent());
        assert!(a.volume < 0.0);
    }
}
