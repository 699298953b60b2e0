//! Tier B: checks on the generated solid.

use tracing::{instrument, warn};

use crate::options::CheckOptions;
use crate::report::CheckResult;
use fission_schema::FissionSchema;

#[cfg(feature = "geometry")]
use crate::options::CheckThresholds;
#[cfg(feature = "geometry")]
use fission_case::CaseGenerator;
#[cfg(feature = "geometry")]
use fission_kernel::{Kernel, SplitKeep};

#[cfg(feature = "geometry")]
const AXES: [&str; 3] = ["W", "L", "H"];

/// Run every solid check against `gen`. A generation error yields a single
/// FAIL and nothing else.
#[cfg(feature = "geometry")]
pub fn check_geometry<K: Kernel>(
    gen: &CaseGenerator<'_, K>,
    t: &CheckThresholds,
) -> Vec<CheckResult> {
    let case = match gen.generate() {
        Ok(case) => case,
        Err(e) => {
            warn!(error = %e, "geometry generation failed");
            return vec![CheckResult::fail(
                "Geometry generation",
                format!("geometry generation error: {e}"),
            )];
        }
    };
    let k = gen.kernel();
    let layout = gen.layout();
    let mut results = Vec::new();

    let volume = k.volume(&case);
    results.push(if volume > 0.0 {
        CheckResult::pass("Case volume", format!("{volume:.1}mm³"))
    } else {
        CheckResult::fail("Case volume", format!("{volume:.3}mm³, solid is empty"))
    });

    let split_z = layout.split_z;
    let outer_h = layout.outer_height;
    results.push(if split_z > 0.0 && split_z < outer_h {
        CheckResult::pass("Split position", format!("Z={split_z:.2}mm"))
    } else {
        CheckResult::fail(
            "Split position",
            format!("Z={split_z:.2}mm outside (0, {outer_h:.2})mm"),
        )
    });

    results.push(check_split_volume(k, &case, split_z, volume, t));

    let size = k.bounding_box(&case).size();
    for ((axis, actual), expected) in AXES.iter().zip(size).zip(layout.outer_size()) {
        let name = format!("Bounding box ({axis})");
        let deviation = (actual - expected).abs();
        results.push(if deviation <= t.solid_bounds_tolerance {
            CheckResult::pass(name, format!("{actual:.2}mm"))
        } else {
            CheckResult::fail(
                name,
                format!("{actual:.2}mm, expected {expected:.2}mm (off by {deviation:.2}mm)"),
            )
        });
    }
    results
}

#[cfg(feature = "geometry")]
fn check_split_volume<K: Kernel>(
    k: &K,
    case: &K::Solid,
    split_z: f64,
    volume: f64,
    t: &CheckThresholds,
) -> CheckResult {
    const NAME: &str = "Top+bottom volume";
    let halves = k
        .split(case, split_z, SplitKeep::Above)
        .and_then(|top| Ok((top, k.split(case, split_z, SplitKeep::Below)?)));
    let (top, bottom) = match halves {
        Ok(halves) => halves,
        Err(e) => return CheckResult::fail(NAME, format!("split failed: {e}")),
    };
    let sum = k.volume(&top) + k.volume(&bottom);
    let rel_error = if volume > 0.0 {
        (sum - volume).abs() / volume
    } else {
        f64::INFINITY
    };
    if rel_error < t.split_volume_tolerance {
        CheckResult::pass(NAME, format!("{:.4}% error", rel_error * 100.0))
    } else {
        CheckResult::warn(
            NAME,
            format!("{sum:.1}mm³ vs {volume:.1}mm³ ({:.2}% error)", rel_error * 100.0),
        )
    }
}

/// Tier B entry point: SKIP when this build cannot generate solids.
#[instrument(skip_all, fields(project = %schema.project))]
pub fn run_geometry_checks(schema: &FissionSchema, options: &CheckOptions) -> Vec<CheckResult> {
    if !options.capabilities.geometry_kernel {
        warn!("geometry kernel unavailable, skipping geometry checks");
        return vec![skipped()];
    }
    #[cfg(feature = "geometry")]
    {
        check_geometry(&CaseGenerator::new(schema), &options.thresholds)
    }
    #[cfg(not(feature = "geometry"))]
    {
        warn!("built without the geometry feature, skipping geometry checks");
        vec![skipped()]
    }
}

fn skipped() -> CheckResult {
    CheckResult::skip("Geometry checks", "geometry kernel not available")
}
