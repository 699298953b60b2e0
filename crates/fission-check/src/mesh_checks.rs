//! Tier C: checks on a triangulated mesh, either supplied or exported on the
//! fly into a temporary directory.

use tracing::{instrument, warn};

use crate::options::CheckOptions;
use crate::report::CheckResult;
use fission_schema::FissionSchema;

#[cfg(feature = "mesh")]
use std::path::Path;

#[cfg(feature = "mesh")]
use tracing::debug;

#[cfg(feature = "mesh")]
use crate::options::CheckThresholds;
#[cfg(feature = "mesh")]
use fission_case::{CaseLayout, CaseParams};
#[cfg(feature = "mesh")]
use fission_mesh::{analyze, load_stl, TriangleMesh};

#[cfg(feature = "mesh")]
const AXES: [&str; 3] = ["W", "L", "H"];

/// Printability checks on `mesh` against the designed outer size.
#[cfg(feature = "mesh")]
pub fn check_mesh(mesh: &TriangleMesh, layout: &CaseLayout, t: &CheckThresholds) -> Vec<CheckResult> {
    let a = analyze(mesh);
    debug!(
        triangles = a.triangles,
        boundary = a.boundary_edges,
        non_manifold = a.non_manifold_edges,
        "mesh analyzed"
    );
    let mut results = Vec::new();

    results.push(if a.is_watertight() {
        CheckResult::pass("Watertight", format!("{} triangles", a.triangles))
    } else {
        CheckResult::fail(
            "Watertight",
            format!(
                "mesh is not watertight ({} open edges, {} non-manifold edges), unprintable",
                a.boundary_edges, a.non_manifold_edges
            ),
        )
    });

    results.push(if a.is_winding_consistent() {
        CheckResult::pass("Winding consistency", "")
    } else {
        CheckResult::fail(
            "Winding consistency",
            format!("{} edges with inconsistent triangle orientation", a.misoriented_edges),
        )
    });

    results.push(if a.volume > 0.0 {
        CheckResult::pass("Mesh volume", format!("{:.1}mm³", a.volume))
    } else {
        CheckResult::fail(
            "Mesh volume",
            format!("{:.3}mm³, possible inverted normals", a.volume),
        )
    });

    let size = a.bounds.size();
    for ((axis, actual), expected) in AXES.iter().zip(size).zip(layout.outer_size()) {
        let name = format!("Mesh dimensions ({axis})");
        let deviation = (actual - expected).abs();
        results.push(if deviation <= t.mesh_bounds_tolerance {
            CheckResult::pass(name, format!("{actual:.2}mm"))
        } else {
            CheckResult::warn(
                name,
                format!("{actual:.2}mm, expected {expected:.2}mm (off by {deviation:.2}mm)"),
            )
        });
    }
    results
}

#[cfg(feature = "mesh")]
fn check_file(path: &Path, layout: &CaseLayout, t: &CheckThresholds) -> Vec<CheckResult> {
    match load_stl(path) {
        Ok(mesh) => check_mesh(&mesh, layout, t),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "mesh could not be loaded");
            vec![CheckResult::fail("STL load", format!("{}: {e}", path.display()))]
        }
    }
}

/// Export the case into a fresh temporary directory and check it. The
/// directory is removed on return whatever the outcome.
#[cfg(all(feature = "mesh", feature = "geometry"))]
fn check_generated(schema: &FissionSchema, layout: &CaseLayout, options: &CheckOptions) -> Vec<CheckResult> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("fission-check-");
    let scratch = match &options.scratch_dir {
        Some(parent) => builder.tempdir_in(parent),
        None => builder.tempdir(),
    };
    let dir = match scratch {
        Ok(dir) => dir,
        Err(e) => {
            return vec![CheckResult::fail(
                "Mesh export",
                format!("could not create temporary directory: {e}"),
            )]
        }
    };
    let path = dir.path().join("case.stl");
    if let Err(e) = fission_case::CaseGenerator::new(schema).export_stl(&path) {
        warn!(error = %e, "mesh export failed");
        return vec![CheckResult::fail("Mesh export", format!("mesh export error: {e}"))];
    }
    check_file(&path, layout, &options.thresholds)
}

/// Tier C entry point. Uses `options.mesh_path` when set, otherwise
/// generates the case (which needs the geometry kernel too).
#[instrument(skip_all, fields(project = %schema.project))]
pub fn run_mesh_checks(schema: &FissionSchema, options: &CheckOptions) -> Vec<CheckResult> {
    let caps = options.capabilities;
    if !caps.mesh_library {
        warn!("mesh library unavailable, skipping mesh checks");
        return vec![CheckResult::skip("Mesh checks", "mesh library not available")];
    }
    #[cfg(feature = "mesh")]
    {
        let layout = CaseLayout::new(schema, CaseParams::default());
        if let Some(path) = &options.mesh_path {
            return check_file(path, &layout, &options.thresholds);
        }
        if caps.geometry_kernel {
            #[cfg(feature = "geometry")]
            return check_generated(schema, &layout, options);
        }
    }
    warn!("no mesh path and no geometry kernel, skipping mesh checks");
    vec![CheckResult::skip(
        "Mesh checks",
        "geometry kernel not available; supply a mesh path to check an existing STL",
    )]
}
