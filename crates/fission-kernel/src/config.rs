//! Kernel tolerances.

/// Numeric settings for primitive construction and evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Maximum distance between a true circle and its polygon (mm).
    pub chord_tolerance: f64,
    /// Lower bound on polygon segments per circle.
    pub min_segments: usize,
    /// Upper bound on polygon segments per circle.
    pub max_segments: usize,
    /// Coordinates closer than this are treated as coincident (mm). Must
    /// stay above `f32` resolution at case scale, or STL export welds
    /// distinct vertices together.
    pub weld_tolerance: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            chord_tolerance: 0.01,
            min_segments: 16,
            max_segments: 256,
            weld_tolerance: 1e-5,
        }
    }
}

impl KernelConfig {
    /// Coarse circles for fast previews and property tests.
    pub fn coarse() -> Self {
        Self {
            chord_tolerance: 0.1,
            min_segments: 8,
            max_segments: 32,
            ..Self::default()
        }
    }

    /// Fine circles for export.
    pub fn fine() -> Self {
        Self {
            chord_tolerance: 0.002,
            min_segments: 32,
            max_segments: 512,
            ..Self::default()
        }
    }
}
