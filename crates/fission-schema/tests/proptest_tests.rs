//! Property-based tests for schema serialization.

use proptest::prelude::*;

use fission_schema::{
    load_schema, save_schema, BoardOutline, ComponentHeight, Connector, Dimensions3D, EdgeSide,
    EnclosureConfig, FissionSchema, MountHole, PcbData, Position3D, SplitType,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_positive() -> impl Strategy<Value = f64> {
    0.01f64..500.0
}

fn arb_coord() -> impl Strategy<Value = f64> {
    -100.0f64..600.0
}

fn arb_edge() -> impl Strategy<Value = Option<EdgeSide>> {
    prop_oneof![
        Just(None),
        Just(Some(EdgeSide::Top)),
        Just(Some(EdgeSide::Bottom)),
        Just(Some(EdgeSide::Left)),
        Just(Some(EdgeSide::Right)),
    ]
}

fn arb_hole() -> impl Strategy<Value = MountHole> {
    (arb_coord(), arb_coord(), arb_positive()).prop_map(|(x, y, d)| MountHole::new(x, y, d).unwrap())
}

fn arb_connector() -> impl Strategy<Value = Connector> {
    (
        "[A-Za-z0-9-]{1,12}",
        proptest::option::of("[A-Z][0-9]{1,3}"),
        (arb_coord(), arb_coord(), 0.0f64..10.0),
        (arb_positive(), arb_positive(), arb_positive()),
        arb_edge(),
    )
        .prop_map(|(kind, reference, (x, y, z), (w, h, d), edge)| {
            let mut c = Connector::new(
                kind,
                Position3D::new(x, y, z).unwrap(),
                Dimensions3D::new(w, h, d).unwrap(),
                edge,
            );
            c.reference = reference;
            c
        })
}

fn arb_schema() -> impl Strategy<Value = FissionSchema> {
    (
        (arb_positive(), arb_positive(), arb_positive()),
        proptest::collection::vec(arb_hole(), 0..6),
        proptest::collection::vec(arb_connector(), 0..4),
        (0.0f64..20.0, 0.0f64..20.0),
        (arb_positive(), 0.0f64..5.0, "[A-Z]{2,5}", any::<bool>()),
    )
        .prop_map(|((w, l, t), holes, connectors, (top, bottom), (wall, clr, material, vertical))| {
            let mut pcb = PcbData::new(BoardOutline::new(w, l, t).unwrap());
            pcb.mount_holes = holes;
            pcb.connectors = connectors;
            pcb.max_component_height = ComponentHeight::new(top, bottom).unwrap();
            let mut schema = FissionSchema::new("prop", pcb);
            schema.enclosure = EnclosureConfig {
                material,
                split: if vertical { SplitType::Vertical } else { SplitType::Horizontal },
                ..EnclosureConfig::new(wall, clr).unwrap()
            };
            schema
        })
}

// ---------------------------------------------------------------------------
// Serialize then deserialize yields an equal schema
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn schema_json_round_trip(schema in arb_schema()) {
        let json = save_schema(&schema).unwrap();
        let back = load_schema(&json).unwrap();
        prop_assert_eq!(schema, back);
    }
}
