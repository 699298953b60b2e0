//! Cell decomposition of a CSG tree.
//!
//! The XY plane is cut at every footprint vertex and every pairwise edge
//! crossing into vertical slabs. Inside a slab no footprint edges cross, so
//! the edges passing through it sort bottom to top and bound trapezoidal
//! cells. Z is cut at every prism and clip plane. Each (cell, z-slab) column
//! lies entirely inside or outside the solid, which is decided by testing
//! its centre point.
//!
//! All coordinates are snapped to canonical values: x to `xs`, the y values
//! met on each vertical line to that line's `line_ys`, z to `zs`. Values
//! within the weld tolerance collapse to the same canonical value, which is
//! what lets the tessellator share vertices without T-junctions. Slab edges
//! are ordered by their snapped indices, never by raw coordinates, so the
//! cells, caps and walls all see the same subdivision.

use tracing::{debug, instrument};

use crate::csg::CsgNode;
use fission_mesh::BoundingBox;

/// A footprint edge clipped to one x-slab, as indices into the canonical
/// y values of the slab's left and right lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabEdge {
    pub left: usize,
    pub right: usize,
}

/// The edges crossing one x-slab, sorted bottom to top. Cell `j` of the
/// slab lies between edge `j` and edge `j + 1`.
#[derive(Debug, Clone)]
pub struct XSlab {
    pub edges: Vec<SlabEdge>,
    /// Global index of this slab's first cell.
    pub first_cell: usize,
}

impl XSlab {
    pub fn cell_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub xs: Vec<f64>,
    pub line_ys: Vec<Vec<f64>>,
    pub slabs: Vec<XSlab>,
    pub zs: Vec<f64>,
    occupancy: Vec<bool>,
    pub volume: f64,
    pub bounds: BoundingBox,
}

impl Evaluation {
    pub fn z_slab_count(&self) -> usize {
        self.zs.len().saturating_sub(1)
    }

    pub fn cell_count(&self) -> usize {
        self.slabs.last().map_or(0, |s| s.first_cell + s.cell_count())
    }

    /// Whether column (`cell`, z-slab `m`) is solid.
    pub fn occupied(&self, cell: usize, m: usize) -> bool {
        self.occupancy[cell * self.z_slab_count() + m]
    }

    pub fn is_empty(&self) -> bool {
        !self.occupancy.iter().any(|o| *o)
    }

    /// Canonical point on vertical line `line` at y index `k`, height index `m`.
    pub fn point(&self, line: usize, k: usize, m: usize) -> [f64; 3] {
        [self.xs[line], self.line_ys[line][k], self.zs[m]]
    }
}

/// Decompose `root` and classify every column.
#[instrument(skip(root))]
pub fn evaluate(root: &CsgNode, tolerance: f64) -> Evaluation {
    let mut segments: Vec<([f64; 2], [f64; 2])> = Vec::new();
    root.visit_prisms(&mut |prism| {
        segments.extend(prism.footprint.edges().into_iter().map(|(a, b)| {
            if a[0] <= b[0] {
                (a, b)
            } else {
                (b, a)
            }
        }))
    });

    let mut xs: Vec<f64> = segments.iter().flat_map(|(a, b)| [a[0], b[0]]).collect();
    xs.extend(crossing_xs(&segments));
    let xs = merge_sorted(xs, tolerance);
    let slab_count = xs.len().saturating_sub(1);

    // Clip every non-vertical edge to the slabs it spans.
    let mut raw: Vec<Vec<(f64, f64)>> = vec![Vec::new(); slab_count];
    for (a, b) in &segments {
        let ia = nearest_index(&xs, a[0]);
        let ib = nearest_index(&xs, b[0]);
        for s in ia..ib {
            let yl = if s == ia { a[1] } else { y_at(a, b, xs[s]) };
            let yr = if s + 1 == ib { b[1] } else { y_at(a, b, xs[s + 1]) };
            raw[s].push((yl, yr));
        }
    }

    let mut line_ys: Vec<Vec<f64>> = vec![Vec::new(); xs.len()];
    for (s, edges) in raw.iter().enumerate() {
        for &(yl, yr) in edges {
            line_ys[s].push(yl);
            line_ys[s + 1].push(yr);
        }
    }
    let line_ys: Vec<Vec<f64>> = line_ys
        .into_iter()
        .map(|ys| merge_sorted(ys, tolerance))
        .collect();

    let mut slabs = Vec::with_capacity(slab_count);
    let mut cells = 0usize;
    for (s, edges) in raw.into_iter().enumerate() {
        let snapped = edges
            .into_iter()
            .map(|(yl, yr)| SlabEdge {
                left: nearest_index(&line_ys[s], yl),
                right: nearest_index(&line_ys[s + 1], yr),
            })
            .collect();
        let slab = XSlab {
            edges: order_slab_edges(snapped),
            first_cell: cells,
        };
        cells += slab.cell_count();
        slabs.push(slab);
    }

    let mut zs = Vec::new();
    root.z_planes(&mut zs);
    let zs = merge_sorted(zs, tolerance);
    let nz = zs.len().saturating_sub(1);

    let mut occupancy = vec![false; cells * nz];
    let mut volume = 0.0;
    let mut bounds = BoundingBox::empty();
    for (s, slab) in slabs.iter().enumerate() {
        let (x0, x1) = (xs[s], xs[s + 1]);
        let xm = 0.5 * (x0 + x1);
        for j in 0..slab.cell_count() {
            let (lo, hi) = (slab.edges[j], slab.edges[j + 1]);
            let (ylb, yrb) = (line_ys[s][lo.left], line_ys[s + 1][lo.right]);
            let (ylt, yrt) = (line_ys[s][hi.left], line_ys[s + 1][hi.right]);
            let area = 0.5 * (x1 - x0) * ((ylt - ylb) + (yrt - yrb));
            let ym = 0.25 * (ylb + yrb + ylt + yrt);
            let cell = slab.first_cell + j;
            for m in 0..nz {
                let zm = 0.5 * (zs[m] + zs[m + 1]);
                if root.contains([xm, ym, zm]) {
                    occupancy[cell * nz + m] = true;
                    volume += area * (zs[m + 1] - zs[m]);
                    bounds.expand_to_include(&[x0, ylb.min(yrb), zs[m]]);
                    bounds.expand_to_include(&[x1, ylt.max(yrt), zs[m + 1]]);
                }
            }
        }
    }

    debug!(
        segments = segments.len(),
        x_slabs = slab_count,
        cells,
        z_slabs = nz,
        volume,
        "cell decomposition complete"
    );

    Evaluation {
        xs,
        line_ys,
        slabs,
        zs,
        occupancy,
        volume,
        bounds,
    }
}

/// Sort snapped slab edges bottom to top so that no two of them cross.
///
/// Snapping can move a crossing that lies within the weld tolerance of a
/// slab boundary onto that boundary, leaving two edges ordered one way on
/// the left line and the other way on the right. Such an edge is lifted
/// onto its lower neighbour's right end, so the order holds on both lines
/// and every cell has non-negative height. Coincident edges collapse into
/// one.
pub fn order_slab_edges(mut edges: Vec<SlabEdge>) -> Vec<SlabEdge> {
    edges.sort_unstable_by_key(|e| (e.left, e.right));
    let mut floor = 0usize;
    for edge in &mut edges {
        edge.right = edge.right.max(floor);
        floor = edge.right;
    }
    edges.dedup();
    edges
}

/// Sort and collapse values closer than `tolerance` to the first of each run.
pub fn merge_sorted(mut values: Vec<f64>, tolerance: f64) -> Vec<f64> {
    values.retain(|v| v.is_finite());
    values.sort_by(f64::total_cmp);
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for v in values {
        match out.last() {
            Some(last) if v - *last <= tolerance => {}
            _ => out.push(v),
        }
    }
    out
}

/// Index of the value in sorted `values` closest to `x`.
pub fn nearest_index(values: &[f64], x: f64) -> usize {
    let i = values.partition_point(|v| *v < x);
    if i == 0 {
        return 0;
    }
    if i == values.len() {
        return values.len() - 1;
    }
    if values[i] - x < x - values[i - 1] {
        i
    } else {
        i - 1
    }
}

fn y_at(a: &[f64; 2], b: &[f64; 2], x: f64) -> f64 {
    let dx = b[0] - a[0];
    if dx <= 0.0 {
        return a[1];
    }
    let t = ((x - a[0]) / dx).clamp(0.0, 1.0);
    a[1] + (b[1] - a[1]) * t
}

/// X coordinates where two segments cross in their interiors.
fn crossing_xs(segments: &[([f64; 2], [f64; 2])]) -> Vec<f64> {
    let mut out = Vec::new();
    for (i, (p, p2)) in segments.iter().enumerate() {
        let (plo, phi) = (p[1].min(p2[1]), p[1].max(p2[1]));
        for (q, q2) in &segments[i + 1..] {
            // Cheap rejection on x and y extents.
            if q2[0] <= p[0] || q[0] >= p2[0] {
                continue;
            }
            if q[1].max(q2[1]) <= plo || q[1].min(q2[1]) >= phi {
                continue;
            }
            let d1 = [p2[0] - p[0], p2[1] - p[1]];
            let d2 = [q2[0] - q[0], q2[1] - q[1]];
            let denom = d1[0] * d2[1] - d1[1] * d2[0];
            if denom.abs() < 1e-12 {
                continue;
            }
            let w = [q[0] - p[0], q[1] - p[1]];
            let t = (w[0] * d2[1] - w[1] * d2[0]) / denom;
            let u = (w[0] * d1[1] - w[1] * d1[0]) / denom;
            if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
                out.push(p[0] + t * d1[0]);
            }
        }
    }
    out
}
