//! Thresholds, capability detection and run options.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

use crate::report::CheckLevel;

/// Numeric limits used by the checks (mm unless noted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckThresholds {
    /// Smallest plausible board extent; below this the units are suspect.
    pub board_min: f64,
    pub board_max: f64,
    /// Thinnest wall an FDM printer reliably produces.
    pub min_wall: f64,
    /// Walls below this print but are flagged.
    pub comfortable_wall: f64,
    pub min_clearance: f64,
    /// Post-to-inner-wall gap below which a post is flagged as tight.
    pub post_wall_margin: f64,
    /// Declared-edge distance beyond which a mismatch is flagged.
    pub edge_distance: f64,
    /// Allowed relative error between top + bottom and the whole (ratio).
    pub split_volume_tolerance: f64,
    /// Solid bounding-box deviation per axis before failing.
    pub solid_bounds_tolerance: f64,
    /// Mesh bounding-box deviation per axis before warning.
    pub mesh_bounds_tolerance: f64,
}

impl Default for CheckThresholds {
    fn default() -> Self {
        Self {
            board_min: 1.0,
            board_max: 5000.0,
            min_wall: 1.5,
            comfortable_wall: 2.0,
            min_clearance: 0.5,
            post_wall_margin: 0.5,
            edge_distance: 5.0,
            split_volume_tolerance: 0.01,
            solid_bounds_tolerance: 0.5,
            mesh_bounds_tolerance: 1.0,
        }
    }
}

/// Optional subsystems compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Solids can be generated (Tier B, and Tier C without a mesh path).
    pub geometry_kernel: bool,
    /// STL files can be loaded and analyzed (Tier C).
    pub mesh_library: bool,
}

impl Capabilities {
    /// What this build supports. Computed once per process.
    pub fn probe() -> Self {
        static PROBED: OnceLock<Capabilities> = OnceLock::new();
        *PROBED.get_or_init(|| {
            let caps = Self {
                geometry_kernel: cfg!(feature = "geometry"),
                mesh_library: cfg!(feature = "mesh"),
            };
            debug!(?caps, "capabilities probed");
            caps
        })
    }

    pub fn none() -> Self {
        Self {
            geometry_kernel: false,
            mesh_library: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Tiers to run; always executed in schema, geometry, mesh order.
    pub levels: Vec<CheckLevel>,
    /// Existing STL to verify instead of generating one.
    pub mesh_path: Option<PathBuf>,
    pub capabilities: Capabilities,
    pub thresholds: CheckThresholds,
    /// Parent directory for the temporary STL; the system temp dir if unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            levels: CheckLevel::ALL.to_vec(),
            mesh_path: None,
            capabilities: Capabilities::probe(),
            thresholds: CheckThresholds::default(),
            scratch_dir: None,
        }
    }
}

impl CheckOptions {
    /// Tier A only.
    pub fn schema_only() -> Self {
        Self::default().with_levels([CheckLevel::Schema])
    }

    pub fn with_levels(mut self, levels: impl IntoIterator<Item = CheckLevel>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    pub fn with_mesh_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mesh_path = Some(path.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_thresholds(mut self, thresholds: CheckThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn runs(&self, level: CheckLevel) -> bool {
        self.levels.contains(&level)
    }
}
