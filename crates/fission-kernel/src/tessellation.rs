//! Boundary mesh extraction from an [`Evaluation`].
//!
//! A face is emitted wherever two neighbouring columns disagree on
//! occupancy: horizontal caps between z-slabs, walls along slab edges, and
//! walls along the vertical lines between slabs. Every face is split at all
//! canonical vertices it touches, so the result is watertight. Faces are
//! wound counter-clockwise seen from the empty side.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::arrangement::{Evaluation, SlabEdge};
use crate::types::KernelError;
use fission_mesh::TriangleMesh;

struct MeshBuilder<'a> {
    eval: &'a Evaluation,
    index: HashMap<(usize, usize, usize), u32>,
    positions: Vec<[f64; 3]>,
    triangles: Vec<[u32; 3]>,
}

impl<'a> MeshBuilder<'a> {
    fn vertex(&mut self, line: usize, k: usize, m: usize) -> u32 {
        let eval = self.eval;
        let positions = &mut self.positions;
        *self.index.entry((line, k, m)).or_insert_with(|| {
            positions.push(eval.point(line, k, m));
            (positions.len() - 1) as u32
        })
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32, flip: bool) {
        if flip {
            self.triangles.push([a, c, b]);
        } else {
            self.triangles.push([a, b, c]);
        }
    }

    /// Horizontal face of the cell between `lo` and `hi` at z index `m`.
    fn cap(&mut self, slab: usize, lo: SlabEdge, hi: SlabEdge, m: usize, facing_up: bool) {
        let left: Vec<usize> = (lo.left.min(hi.left)..=lo.left.max(hi.left)).collect();
        let right: Vec<usize> = (lo.right.min(hi.right)..=lo.right.max(hi.right)).collect();
        let ys_left = &self.eval.line_ys[slab];
        let ys_right = &self.eval.line_ys[slab + 1];

        // Zip up the two vertical chains; each step yields a triangle that
        // is counter-clockwise seen from +Z.
        let (mut a, mut b) = (0usize, 0usize);
        while a + 1 < left.len() || b + 1 < right.len() {
            let advance_left = if a + 1 == left.len() {
                false
            } else if b + 1 == right.len() {
                true
            } else {
                ys_left[left[a + 1]] <= ys_right[right[b + 1]]
            };
            let l = self.vertex(slab, left[a], m);
            let r = self.vertex(slab + 1, right[b], m);
            if advance_left {
                let next = self.vertex(slab, left[a + 1], m);
                self.triangle(l, r, next, !facing_up);
                a += 1;
            } else {
                let next = self.vertex(slab + 1, right[b + 1], m);
                self.triangle(l, r, next, !facing_up);
                b += 1;
            }
        }
    }

    /// Wall along a slab edge for z-slab `m`. The natural winding faces the
    /// cell below the edge.
    fn edge_wall(&mut self, slab: usize, edge: SlabEdge, m: usize, solid_above: bool) {
        let p0 = self.vertex(slab, edge.left, m);
        let p1 = self.vertex(slab + 1, edge.right, m);
        let p2 = self.vertex(slab + 1, edge.right, m + 1);
        let p3 = self.vertex(slab, edge.left, m + 1);
        self.triangle(p0, p1, p2, !solid_above);
        self.triangle(p0, p2, p3, !solid_above);
    }

    /// Wall on vertical line `line` between y indices `k` and `k + 1`. The
    /// natural winding faces +X.
    fn line_wall(&mut self, line: usize, k: usize, m: usize, solid_left: bool) {
        let a = self.vertex(line, k, m);
        let b = self.vertex(line, k + 1, m);
        let b_up = self.vertex(line, k + 1, m + 1);
        let a_up = self.vertex(line, k, m + 1);
        self.triangle(a, b, b_up, !solid_left);
        self.triangle(a, b_up, a_up, !solid_left);
    }
}

/// Extract the closed boundary mesh of an evaluated solid.
#[instrument(skip(eval))]
pub fn tessellate(eval: &Evaluation) -> Result<TriangleMesh, KernelError> {
    if eval.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid is empty".to_string(),
        });
    }

    let nz = eval.z_slab_count();
    let mut builder = MeshBuilder {
        eval,
        index: HashMap::new(),
        positions: Vec::new(),
        triangles: Vec::new(),
    };

    for (s, slab) in eval.slabs.iter().enumerate() {
        for j in 0..slab.cell_count() {
            let cell = slab.first_cell + j;
            for m in 0..=nz {
                let below = m > 0 && eval.occupied(cell, m - 1);
                let above = m < nz && eval.occupied(cell, m);
                if below != above {
                    builder.cap(s, slab.edges[j], slab.edges[j + 1], m, below);
                }
            }
        }

        let edge_count = slab.edges.len();
        for (j, edge) in slab.edges.iter().enumerate() {
            let below = (j > 0).then(|| slab.first_cell + j - 1);
            let above = (j + 1 < edge_count).then(|| slab.first_cell + j);
            for m in 0..nz {
                let solid_below = below.is_some_and(|c| eval.occupied(c, m));
                let solid_above = above.is_some_and(|c| eval.occupied(c, m));
                if solid_below != solid_above {
                    builder.edge_wall(s, *edge, m, solid_above);
                }
            }
        }
    }

    for line in 0..eval.xs.len() {
        let intervals = eval.line_ys[line].len().saturating_sub(1);
        if intervals == 0 {
            continue;
        }
        let mut left_cell: Vec<Option<usize>> = vec![None; intervals];
        let mut right_cell: Vec<Option<usize>> = vec![None; intervals];
        if line > 0 {
            let slab = &eval.slabs[line - 1];
            for j in 0..slab.cell_count() {
                let (a, b) = (slab.edges[j].right, slab.edges[j + 1].right);
                for owner in &mut left_cell[a.min(b)..a.max(b)] {
                    *owner = Some(slab.first_cell + j);
                }
            }
        }
        if let Some(slab) = eval.slabs.get(line) {
            for j in 0..slab.cell_count() {
                let (a, b) = (slab.edges[j].left, slab.edges[j + 1].left);
                for owner in &mut right_cell[a.min(b)..a.max(b)] {
                    *owner = Some(slab.first_cell + j);
                }
            }
        }
        for k in 0..intervals {
            for m in 0..nz {
                let solid_left = left_cell[k].is_some_and(|c| eval.occupied(c, m));
                let solid_right = right_cell[k].is_some_and(|c| eval.occupied(c, m));
                if solid_left != solid_right {
                    builder.line_wall(line, k, m, solid_left);
                }
            }
        }
    }

    debug!(
        vertices = builder.positions.len(),
        triangles = builder.triangles.len(),
        "boundary mesh extracted"
    );
    Ok(TriangleMesh {
        positions: builder.positions,
        triangles: builder.triangles,
    })
}
