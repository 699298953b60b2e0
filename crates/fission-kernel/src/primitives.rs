//! Extruded-footprint primitives.
//!
//! Cylinders are inscribed regular polygons whose segment count follows the
//! configured chord tolerance, rounded to a multiple of four so the polygon
//! touches the circle's axis extremes.

use std::f64::consts::PI;

use crate::config::KernelConfig;
use crate::types::KernelError;

/// A planar region in XY.
#[derive(Debug, Clone, PartialEq)]
pub enum Footprint {
    Rect { min: [f64; 2], max: [f64; 2] },
    /// Convex polygon, counter-clockwise.
    Polygon(Vec<[f64; 2]>),
}

impl Footprint {
    /// Strict interior test. Points on the boundary are outside.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        match self {
            Footprint::Rect { min, max } => {
                p[0] > min[0] && p[0] < max[0] && p[1] > min[1] && p[1] < max[1]
            }
            Footprint::Polygon(vertices) => {
                let n = vertices.len();
                (0..n).all(|i| {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % n];
                    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]) > 0.0
                })
            }
        }
    }

    /// Boundary edges as point pairs.
    pub fn edges(&self) -> Vec<([f64; 2], [f64; 2])> {
        match self {
            Footprint::Rect { min, max } => {
                let c = [*min, [max[0], min[1]], *max, [min[0], max[1]]];
                (0..4).map(|i| (c[i], c[(i + 1) % 4])).collect()
            }
            Footprint::Polygon(v) => (0..v.len()).map(|i| (v[i], v[(i + 1) % v.len()])).collect(),
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Footprint::Rect { min, max } => (max[0] - min[0]) * (max[1] - min[1]),
            Footprint::Polygon(v) => {
                let n = v.len();
                let twice: f64 = (0..n)
                    .map(|i| {
                        let (a, b) = (v[i], v[(i + 1) % n]);
                        a[0] * b[1] - b[0] * a[1]
                    })
                    .sum();
                twice / 2.0
            }
        }
    }

    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        match self {
            Footprint::Rect { min, max } => (*min, *max),
            Footprint::Polygon(v) => v.iter().fold(
                ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
                |(lo, hi), p| {
                    (
                        [lo[0].min(p[0]), lo[1].min(p[1])],
                        [hi[0].max(p[0]), hi[1].max(p[1])],
                    )
                },
            ),
        }
    }
}

/// A footprint swept from `z_min` to `z_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prism {
    pub footprint: Footprint,
    pub z_min: f64,
    pub z_max: f64,
}

impl Prism {
    pub fn cuboid(center: [f64; 3], size: [f64; 3]) -> Result<Self, KernelError> {
        check_finite(&center, "box center")?;
        if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(KernelError::InvalidPrimitive {
                reason: format!("box size must be positive, got {size:?}"),
            });
        }
        let half = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];
        Ok(Self {
            footprint: Footprint::Rect {
                min: [center[0] - half[0], center[1] - half[1]],
                max: [center[0] + half[0], center[1] + half[1]],
            },
            z_min: center[2] - half[2],
            z_max: center[2] + half[2],
        })
    }

    pub fn cylinder(
        center: [f64; 3],
        radius: f64,
        height: f64,
        config: &KernelConfig,
    ) -> Result<Self, KernelError> {
        check_finite(&center, "cylinder center")?;
        if !radius.is_finite() || radius <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(KernelError::InvalidPrimitive {
                reason: format!(
                    "cylinder radius and height must be positive, got r={radius} h={height}"
                ),
            });
        }
        let n = circle_segments(radius, config);
        Ok(Self {
            footprint: Footprint::Polygon(regular_polygon([center[0], center[1]], radius, n)),
            z_min: center[2] - height / 2.0,
            z_max: center[2] + height / 2.0,
        })
    }

    pub fn contains(&self, p: [f64; 3]) -> bool {
        p[2] > self.z_min && p[2] < self.z_max && self.footprint.contains([p[0], p[1]])
    }

    pub fn volume(&self) -> f64 {
        self.footprint.area() * (self.z_max - self.z_min)
    }
}

fn check_finite(values: &[f64], what: &str) -> Result<(), KernelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(KernelError::InvalidPrimitive {
            reason: format!("{what} must be finite, got {values:?}"),
        })
    }
}

/// Segment count for a circle of `radius` under the chord tolerance.
pub fn circle_segments(radius: f64, config: &KernelConfig) -> usize {
    let ratio = config.chord_tolerance / radius;
    let ideal = if ratio >= 1.0 {
        config.min_segments
    } else {
        (PI / (1.0 - ratio).acos()).ceil() as usize
    };
    let n = ideal.min(config.max_segments).max(config.min_segments).max(4);
    n.div_ceil(4) * 4
}

/// Counter-clockwise regular polygon inscribed in a circle, first vertex on +X.
pub fn regular_polygon(center: [f64; 2], radius: f64, n: usize) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / n as f64;
            [center[0] + radius * t.cos(), center[1] + radius * t.sin()]
        })
        .collect()
}
