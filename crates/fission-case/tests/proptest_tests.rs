//! Property-based tests for enclosure generation using the `proptest` crate.

#![cfg(feature = "kernel")]

use proptest::prelude::*;

use fission_case::CaseGenerator;
use fission_kernel::{Kernel, KernelConfig, PrismKernel};
use fission_mesh::analyze;
use fission_schema::{
    BoardOutline, ComponentHeight, Connector, Dimensions3D, EdgeSide, EnclosureConfig,
    FissionSchema, MountHole, PcbData, Position3D,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Board width, length, thickness.
fn arb_board() -> impl Strategy<Value = (f64, f64, f64)> {
    (20.0f64..150.0, 20.0f64..150.0, 0.8f64..2.4)
}

/// Wall, clearance, top height, bottom height.
fn arb_enclosure() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (1.0f64..4.0, 0.0f64..2.0, 0.0f64..10.0, 0.0f64..5.0)
}

/// Like [`arb_enclosure`], but posts are either the default standoff or at
/// least 1mm tall, so a post always outweighs its bore's dimple in the floor.
fn arb_enclosure_with_standoff() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (
        1.0f64..4.0,
        0.0f64..2.0,
        0.0f64..10.0,
        prop_oneof![Just(0.0), 1.0f64..5.0],
    )
}

/// A tight cluster of holes, so neighbouring posts and bores overlap.
/// Returned as (centre fraction, offsets and diameters in mm).
fn arb_holes() -> impl Strategy<Value = ((f64, f64), Vec<(f64, f64, f64)>)> {
    (
        (0.0f64..1.0, 0.0f64..1.0),
        prop::collection::vec((-3.0f64..3.0, -3.0f64..3.0, 1.5f64..3.5), 0..5),
    )
}

/// Edge, position along the edge as a fraction, connector width and height.
fn arb_connector() -> impl Strategy<Value = (EdgeSide, f64, f64, f64)> {
    (
        prop::sample::select(EdgeSide::ALL.to_vec()),
        0.25f64..0.75,
        3.0f64..10.0,
        2.0f64..8.0,
    )
}

fn arb_connectors() -> impl Strategy<Value = Vec<(EdgeSide, f64, f64, f64)>> {
    prop::collection::vec(arb_connector(), 0..3)
}

/// Board-space position of a connector at `along` on `edge`.
fn edge_position(edge: EdgeSide, along: f64, w: f64, l: f64) -> (f64, f64) {
    match edge {
        EdgeSide::Top => (along * w, 0.0),
        EdgeSide::Bottom => (along * w, l),
        EdgeSide::Left => (0.0, along * l),
        EdgeSide::Right => (w, along * l),
    }
}

fn connector((edge, along, width, height): (EdgeSide, f64, f64, f64), w: f64, l: f64) -> Connector {
    let (x, y) = edge_position(edge, along, w, l);
    Connector::new(
        "JST",
        Position3D::new(x, y, 0.0).unwrap(),
        Dimensions3D::new(width, height, 6.0).unwrap(),
        Some(edge),
    )
}

fn make_schema(
    (w, l, t): (f64, f64, f64),
    (wall, clr, top, bottom): (f64, f64, f64, f64),
    ((fx, fy), holes): &((f64, f64), Vec<(f64, f64, f64)>),
    connectors: &[(EdgeSide, f64, f64, f64)],
) -> FissionSchema {
    let mut pcb = PcbData::new(BoardOutline::new(w, l, t).unwrap());
    pcb.max_component_height = ComponentHeight::new(top, bottom).unwrap();
    // The cluster centre stays far enough from the edges that every post
    // sits inside the cavity.
    let (cx, cy) = (7.0 + fx * (w - 14.0), 7.0 + fy * (l - 14.0));
    for (dx, dy, d) in holes {
        pcb.mount_holes.push(MountHole::new(cx + dx, cy + dy, *d).unwrap());
    }
    for c in connectors {
        pcb.connectors.push(connector(*c, w, l));
    }
    let mut schema = FissionSchema::new("prop", pcb);
    schema.enclosure = EnclosureConfig::new(wall, clr).unwrap();
    schema
}

fn coarse(schema: &FissionSchema) -> CaseGenerator<'_, PrismKernel> {
    CaseGenerator::with_kernel(schema, PrismKernel::with_config(KernelConfig::coarse()))
}

fn case_volume(schema: &FissionSchema) -> f64 {
    let gen = coarse(schema);
    gen.kernel().volume(&gen.generate().unwrap())
}

fn post_radius(diameter: f64) -> f64 {
    (diameter + 2.0) / 2.0
}

// ---------------------------------------------------------------------------
// 1. Generated bounds equal the computed outer size
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn bounds_match_layout(board in arb_board(), encl in arb_enclosure(), holes in arb_holes()) {
        let schema = make_schema(board, encl, &holes, &[]);
        let gen = coarse(&schema);
        let case = gen.generate().unwrap();
        let size = gen.kernel().bounding_box(&case).size();
        let expected = gen.layout().outer_size();
        for axis in 0..3 {
            prop_assert!((size[axis] - expected[axis]).abs() < 1e-3,
                "axis {}: {} vs {}", axis, size[axis], expected[axis]);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Top and bottom shells partition the case volume
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn split_partitions_case(
        board in arb_board(),
        encl in arb_enclosure(),
        holes in arb_holes(),
        connectors in arb_connectors(),
    ) {
        let schema = make_schema(board, encl, &holes, &connectors);
        let gen = coarse(&schema);
        let k = gen.kernel();
        let full = k.volume(&gen.generate().unwrap());
        let top = k.volume(&gen.generate_top().unwrap());
        let bottom = k.volume(&gen.generate_bottom().unwrap());
        prop_assert!(full > 0.0);
        prop_assert!(top > 0.0 && bottom > 0.0);
        prop_assert!(((top + bottom) - full).abs() / full < 1e-4,
            "top={} bottom={} full={}", top, bottom, full);
    }
}

// ---------------------------------------------------------------------------
// 3. The exported mesh is closed and matches the solid
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn case_mesh_is_closed(
        board in arb_board(),
        encl in arb_enclosure(),
        holes in arb_holes(),
        connectors in arb_connectors(),
    ) {
        let schema = make_schema(board, encl, &holes, &connectors);
        let gen = coarse(&schema);
        let k = gen.kernel();
        let case = gen.generate().unwrap();
        let volume = k.volume(&case);
        let a = analyze(&k.tessellate(&case).unwrap());
        prop_assert!(a.is_watertight(), "{:?}", a);
        prop_assert!(a.is_winding_consistent(), "{:?}", a);
        prop_assert!((a.volume - volume).abs() < 1e-6 * volume,
            "mesh={} solid={}", a.volume, volume);
    }
}

// ---------------------------------------------------------------------------
// 4. A free-standing mount hole adds material
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn adding_a_hole_increases_volume(
        board in arb_board(),
        encl in arb_enclosure_with_standoff(),
        holes in arb_holes(),
        connectors in arb_connectors(),
        (fx, fy, d) in (0.0f64..1.0, 0.0f64..1.0, 1.5f64..3.5),
    ) {
        let schema = make_schema(board, encl, &holes, &connectors);
        let (w, l, _) = board;
        let hole = MountHole::new(4.0 + fx * (w - 8.0), 4.0 + fy * (l - 8.0), d).unwrap();
        for other in &schema.pcb.mount_holes {
            let gap = (hole.x.get() - other.x.get()).hypot(hole.y.get() - other.y.get());
            prop_assume!(gap > post_radius(d) + post_radius(other.diameter.get()) + 0.1);
        }

        let mut with_hole = schema.clone();
        with_hole.pcb.mount_holes.push(hole);
        let (before, after) = (case_volume(&schema), case_volume(&with_hole));
        prop_assert!(after > before, "before={} after={}", before, after);
    }
}

// ---------------------------------------------------------------------------
// 5. A separate edge connector removes material
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn adding_a_connector_decreases_volume(
        board in arb_board(),
        encl in arb_enclosure(),
        holes in arb_holes(),
        connectors in arb_connectors(),
        extra in arb_connector(),
    ) {
        let (w, l, _) = board;
        let (edge, along, width, _) = extra;
        let span = |e: EdgeSide| if matches!(e, EdgeSide::Top | EdgeSide::Bottom) { w } else { l };
        // Cutouts on the same wall must not overlap, or the new one may
        // remove nothing.
        for (other_edge, other_along, other_width, _) in &connectors {
            if *other_edge == edge {
                let gap = (along - other_along).abs() * span(edge);
                prop_assume!(gap > (width + other_width) / 2.0 + 2.0);
            }
        }

        let schema = make_schema(board, encl, &holes, &connectors);
        let mut with_connector = schema.clone();
        with_connector.pcb.connectors.push(connector(extra, w, l));
        let (before, after) = (case_volume(&schema), case_volume(&with_connector));
        prop_assert!(after < before, "before={} after={}", before, after);
    }
}
