//! Tier A: numeric checks on the schema. No geometry is built.

use tracing::{debug, instrument};

use crate::options::CheckThresholds;
use crate::report::CheckResult;
use fission_case::{CaseLayout, CaseParams};
use fission_schema::{EdgeSide, FissionSchema};

pub fn check_board_dimensions(schema: &FissionSchema, t: &CheckThresholds) -> Vec<CheckResult> {
    let outline = &schema.pcb.outline;
    [("width", outline.width.get()), ("length", outline.length.get())]
        .into_iter()
        .map(|(axis, value)| {
            let name = format!("Board dimension ({axis})");
            if value < t.board_min {
                CheckResult::fail(name, format!("{value:.2}mm, too small, check units are mm"))
            } else if value > t.board_max {
                CheckResult::fail(name, format!("{value:.2}mm, too large"))
            } else {
                CheckResult::pass(name, format!("{value:.1}mm"))
            }
        })
        .collect()
}

pub fn check_wall_thickness(schema: &FissionSchema, t: &CheckThresholds) -> CheckResult {
    const NAME: &str = "Wall thickness (FDM minimum)";
    let wall = schema.enclosure.wall_thickness.get();
    if wall < t.min_wall {
        CheckResult::fail(
            NAME,
            format!("{wall:.1}mm < FDM minimum {}mm", t.min_wall),
        )
    } else if wall < t.comfortable_wall {
        CheckResult::warn(
            NAME,
            format!(
                "{wall:.1}mm, above minimum but below comfort threshold {}mm",
                t.comfortable_wall
            ),
        )
    } else {
        CheckResult::pass(NAME, format!("{wall:.1}mm"))
    }
}

pub fn check_clearance(schema: &FissionSchema, t: &CheckThresholds) -> CheckResult {
    const NAME: &str = "Clearance";
    let clearance = schema.enclosure.clearance.get();
    if clearance < t.min_clearance {
        CheckResult::warn(
            NAME,
            format!(
                "{clearance:.2}mm < {}mm, print tolerance may cause interference",
                t.min_clearance
            ),
        )
    } else {
        CheckResult::pass(NAME, format!("{clearance:.2}mm"))
    }
}

/// One result per hole; a single warning when there are none.
pub fn check_mount_holes_in_bounds(schema: &FissionSchema) -> Vec<CheckResult> {
    let outline = &schema.pcb.outline;
    let (w, l) = (outline.width.get(), outline.length.get());
    if schema.pcb.mount_holes.is_empty() {
        return vec![CheckResult::warn("Mount hole bounds", "no mount holes defined")];
    }
    schema
        .pcb
        .mount_holes
        .iter()
        .map(|hole| {
            let (x, y) = (hole.x.get(), hole.y.get());
            let name = format!("Mount hole bounds ({x:.1}, {y:.1})");
            let inside = (0.0..=w).contains(&x) && (0.0..=l).contains(&y);
            if inside {
                CheckResult::pass(name, "")
            } else {
                CheckResult::fail(name, format!("outside board outline [{w}x{l}mm]"))
            }
        })
        .collect()
}

/// Gap between each post and the inner walls, using the generator's layout.
pub fn check_mount_post_clearance(
    schema: &FissionSchema,
    layout: &CaseLayout,
    t: &CheckThresholds,
) -> Vec<CheckResult> {
    let half_w = layout.inner_width / 2.0;
    let half_l = layout.inner_length / 2.0;
    schema
        .pcb
        .mount_holes
        .iter()
        .zip(&layout.posts)
        .map(|(hole, post)| {
            let [cx, cy] = post.center;
            let gap_x = half_w - cx.abs() - post.post_radius;
            let gap_y = half_l - cy.abs() - post.post_radius;
            let min_gap = gap_x.min(gap_y);
            let name = format!(
                "Mount post clearance ({:.1}, {:.1})",
                hole.x.get(),
                hole.y.get()
            );
            if gap_x < 0.0 || gap_y < 0.0 {
                CheckResult::fail(
                    name,
                    format!(
                        "post interferes with inner wall (X margin {gap_x:.2}mm, Y margin {gap_y:.2}mm)"
                    ),
                )
            } else if min_gap < t.post_wall_margin {
                CheckResult::warn(
                    name,
                    format!("tight clearance to inner wall (min {min_gap:.2}mm)"),
                )
            } else {
                CheckResult::pass(name, "")
            }
        })
        .collect()
}

pub fn check_connector_edge_assignment(schema: &FissionSchema) -> Vec<CheckResult> {
    schema
        .pcb
        .connectors
        .iter()
        .map(|c| {
            let name = format!("Connector edge ({})", c.label());
            match c.edge {
                Some(_) => CheckResult::pass(name, ""),
                None => CheckResult::warn(name, "no edge assigned, cutout will be skipped"),
            }
        })
        .collect()
}

/// Declared edge against the closest edge. Connectors without an edge are
/// left to [`check_connector_edge_assignment`].
pub fn check_connector_position_consistency(
    schema: &FissionSchema,
    t: &CheckThresholds,
) -> Vec<CheckResult> {
    let outline = &schema.pcb.outline;
    schema
        .pcb
        .connectors
        .iter()
        .filter_map(|c| {
            let declared = c.edge?;
            let (x, y) = (c.position.x.get(), c.position.y.get());
            let (closest, _) = EdgeSide::closest(outline, x, y);
            let declared_distance = declared.distance(outline, x, y);
            let name = format!("Connector position ({})", c.label());
            Some(if declared != closest && declared_distance > t.edge_distance {
                CheckResult::warn(
                    name,
                    format!(
                        "declared edge inconsistent with position: declared {declared} \
                         but closest edge is {closest} ({declared_distance:.1}mm from declared)"
                    ),
                )
            } else {
                CheckResult::pass(name, "")
            })
        })
        .collect()
}

/// Every Tier A check, in a fixed order.
#[instrument(skip_all, fields(project = %schema.project))]
pub fn run_schema_checks(schema: &FissionSchema, t: &CheckThresholds) -> Vec<CheckResult> {
    let layout = CaseLayout::new(schema, CaseParams::default());
    let mut results = check_board_dimensions(schema, t);
    results.push(check_wall_thickness(schema, t));
    results.push(check_clearance(schema, t));
    results.extend(check_mount_holes_in_bounds(schema));
    results.extend(check_mount_post_clearance(schema, &layout, t));
    results.extend(check_connector_edge_assignment(schema));
    results.extend(check_connector_position_consistency(schema, t));
    debug!(results = results.len(), "schema checks complete");
    results
}
