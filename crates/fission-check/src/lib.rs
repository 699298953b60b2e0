//! Three-tier verification of an enclosure design.
//!
//! Tier A checks the schema numerically, Tier B checks the generated solid
//! and Tier C checks a triangulated mesh. Tiers B and C degrade to a single
//! SKIP result when this build lacks the `geometry` or `mesh` feature, so a
//! schema-only build still produces a useful report.

pub mod geometry_checks;
pub mod mesh_checks;
pub mod options;
pub mod report;
pub mod schema_checks;

pub use options::{Capabilities, CheckOptions, CheckThresholds};
pub use report::{CheckLevel, CheckReport, CheckResult, CheckStatus, ParseCheckLevelError};

use tracing::{info, instrument};

use fission_schema::FissionSchema;

/// Run the requested tiers in schema, geometry, mesh order and collect every
/// result. A failure in one tier never prevents the next from running.
#[instrument(skip_all, fields(project = %schema.project))]
pub fn run_checks(schema: &FissionSchema, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::new();
    for level in CheckLevel::ALL {
        if !options.runs(level) {
            continue;
        }
        let results = match level {
            CheckLevel::Schema => schema_checks::run_schema_checks(schema, &options.thresholds),
            CheckLevel::Geometry => geometry_checks::run_geometry_checks(schema, options),
            CheckLevel::Mesh => mesh_checks::run_mesh_checks(schema, options),
        };
        report.extend(results);
    }
    info!(
        passed = report.pass_count(),
        warnings = report.warn_count(),
        failed = report.fail_count(),
        skipped = report.skip_count(),
        "verification complete"
    );
    report
}
