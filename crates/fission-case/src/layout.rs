//! Enclosure dimensions derived from a schema.
//!
//! Everything here is plain arithmetic on the schema; no solid is built.
//! The generator and the verification checks both read positions from a
//! [`CaseLayout`], so board coordinates are projected into case space by a
//! single formula ([`CaseLayout::to_case_xy`]).
//!
//! Case space: origin at the centre of the outer footprint, Z up with the
//! floor's underside at Z = 0, Y flipped relative to board space.

use fission_schema::{Connector, EdgeSide, FissionSchema, SplitType};

/// Fixed construction margins (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseParams {
    /// Post diameter minus hole diameter.
    pub post_diameter_margin: f64,
    /// Extra opening around a connector, per side.
    pub cutout_margin: f64,
    /// Cutout depth as a multiple of the wall thickness.
    pub cutout_depth_factor: f64,
    /// Bore length beyond the post, per end.
    pub bore_overcut: f64,
    /// Post height used when nothing hangs below the board.
    pub min_standoff: f64,
}

impl Default for CaseParams {
    fn default() -> Self {
        Self {
            post_diameter_margin: 2.0,
            cutout_margin: 1.0,
            cutout_depth_factor: 3.0,
            bore_overcut: 0.1,
            min_standoff: 2.0,
        }
    }
}

impl CaseParams {
    /// Post outer radius for a hole of `hole_diameter`.
    pub fn post_radius(&self, hole_diameter: f64) -> f64 {
        (hole_diameter + self.post_diameter_margin) / 2.0
    }
}

/// A mount post and its screw bore, in case space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountPost {
    pub center: [f64; 2],
    pub post_radius: f64,
    pub bore_radius: f64,
    /// Post bottom, on top of the floor.
    pub base_z: f64,
    pub height: f64,
    /// Bore length, centred on the post.
    pub bore_length: f64,
}

impl MountPost {
    pub fn center_z(&self) -> f64 {
        self.base_z + self.height / 2.0
    }
}

/// A box removed from one outer wall for a connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Cutout {
    pub label: String,
    pub edge: EdgeSide,
    pub center: [f64; 3],
    pub size: [f64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseLayout {
    pub params: CaseParams,
    pub split: SplitType,
    pub board_width: f64,
    pub board_length: f64,
    pub board_thickness: f64,
    pub wall: f64,
    pub clearance: f64,
    pub outer_width: f64,
    pub outer_length: f64,
    pub outer_height: f64,
    pub inner_width: f64,
    pub inner_length: f64,
    pub inner_height: f64,
    /// Underside of the board above Z = 0.
    pub pcb_bottom_z: f64,
    /// Height of the horizontal split plane (mid-board).
    pub split_z: f64,
    pub standoff_height: f64,
    pub posts: Vec<MountPost>,
    /// Cutouts for connectors assigned to an edge, in schema order.
    pub cutouts: Vec<Cutout>,
    /// Labels of connectors without an edge; they get no cutout.
    pub unplaced_connectors: Vec<String>,
}

impl CaseLayout {
    pub fn new(schema: &FissionSchema, params: CaseParams) -> Self {
        let outline = &schema.pcb.outline;
        let heights = &schema.pcb.max_component_height;
        let wall = schema.enclosure.wall_thickness.get();
        let clearance = schema.enclosure.clearance.get();
        let (width, length, thickness) = (
            outline.width.get(),
            outline.length.get(),
            outline.thickness.get(),
        );
        let (top_h, bottom_h) = (heights.top.get(), heights.bottom.get());

        let outer_height = wall + bottom_h + thickness + top_h + clearance + wall;
        let pcb_bottom_z = wall + bottom_h;
        let standoff_height = if bottom_h > 0.0 {
            bottom_h
        } else {
            params.min_standoff
        };

        let mut layout = Self {
            params,
            split: schema.enclosure.split,
            board_width: width,
            board_length: length,
            board_thickness: thickness,
            wall,
            clearance,
            outer_width: width + 2.0 * clearance + 2.0 * wall,
            outer_length: length + 2.0 * clearance + 2.0 * wall,
            outer_height,
            inner_width: width + 2.0 * clearance,
            inner_length: length + 2.0 * clearance,
            inner_height: outer_height - wall,
            pcb_bottom_z,
            split_z: pcb_bottom_z + thickness / 2.0,
            standoff_height,
            posts: Vec::new(),
            cutouts: Vec::new(),
            unplaced_connectors: Vec::new(),
        };

        layout.posts = schema
            .pcb
            .mount_holes
            .iter()
            .map(|hole| {
                let (x, y) = layout.to_case_xy(hole.x.get(), hole.y.get());
                let d = hole.diameter.get();
                MountPost {
                    center: [x, y],
                    post_radius: params.post_radius(d),
                    bore_radius: d / 2.0,
                    base_z: wall,
                    height: standoff_height,
                    bore_length: standoff_height + 2.0 * params.bore_overcut,
                }
            })
            .collect();

        for connector in &schema.pcb.connectors {
            match connector.edge {
                Some(edge) => {
                    let cutout = layout.cutout(connector, edge);
                    layout.cutouts.push(cutout);
                }
                None => layout
                    .unplaced_connectors
                    .push(connector.label().to_string()),
            }
        }
        layout
    }

    /// Board coordinates (origin top-left, Y down) to case XY.
    pub fn to_case_xy(&self, board_x: f64, board_y: f64) -> (f64, f64) {
        (
            board_x - self.board_width / 2.0,
            -(board_y - self.board_length / 2.0),
        )
    }

    pub fn outer_size(&self) -> [f64; 3] {
        [self.outer_width, self.outer_length, self.outer_height]
    }

    /// Centre of the cavity box; its top is flush with the open rim.
    pub fn cavity_center_z(&self) -> f64 {
        self.wall + self.inner_height / 2.0
    }

    fn cutout(&self, connector: &Connector, edge: EdgeSide) -> Cutout {
        let p = &self.params;
        let (x, y) = self.to_case_xy(connector.position.x.get(), connector.position.y.get());
        let width = connector.dimensions.width.get() + 2.0 * p.cutout_margin;
        let height = connector.dimensions.height.get() + 2.0 * p.cutout_margin;
        let depth = p.cutout_depth_factor * self.wall;
        let z = self.pcb_bottom_z + self.board_thickness + connector.dimensions.height.get() / 2.0;

        let (center, size) = match edge {
            EdgeSide::Top => ([x, self.outer_length / 2.0, z], [width, depth, height]),
            EdgeSide::Bottom => ([x, -self.outer_length / 2.0, z], [width, depth, height]),
            EdgeSide::Right => ([self.outer_width / 2.0, y, z], [depth, width, height]),
            EdgeSide::Left => ([-self.outer_width / 2.0, y, z], [depth, width, height]),
        };
        Cutout {
            label: connector.label().to_string(),
            edge,
            center,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fission_schema::{
        BoardOutline, ComponentHeight, Dimensions3D, EnclosureConfig, MountHole, PcbData,
        Position3D,
    };

    fn schema(bottom_h: f64) -> FissionSchema {
        let mut pcb = PcbData::new(BoardOutline::new(80.0, 60.0, 1.6).unwrap());
        pcb.max_component_height = ComponentHeight::new(2.5, bottom_h).unwrap();
        pcb.mount_holes.push(MountHole::new(5.0, 5.0, 3.2).unwrap());
        let mut s = FissionSchema::new("layout", pcb);
        s.enclosure = EnclosureConfig::new(2.0, 1.0).unwrap();
        s
    }

    fn connector(edge: Option<EdgeSide>, x: f64, y: f64) -> Connector {
        Connector::new(
            "USB-C",
            Position3D::new(x, y, 1.6).unwrap(),
            Dimensions3D::new(9.0, 3.2, 7.5).unwrap(),
            edge,
        )
        .with_reference("J1")
    }

    #[test]
    fn dimensions_follow_board_and_config() {
        let l = CaseLayout::new(&schema(1.0), CaseParams::default());
        assert_eq!(l.outer_width, 86.0);
        assert_eq!(l.outer_length, 66.0);
        assert!((l.outer_height - 10.1).abs() < 1e-12);
        assert_eq!(l.inner_width, 82.0);
        assert_eq!(l.inner_length, 62.0);
        assert!((l.inner_height - 8.1).abs() < 1e-12);
        assert_eq!(l.pcb_bottom_z, 3.0);
        assert!((l.split_z - 3.8).abs() < 1e-12);
        assert_eq!(l.standoff_height, 1.0);
    }

    #[test]
    fn standoff_falls_back_when_nothing_below_board() {
        let l = CaseLayout::new(&schema(0.0), CaseParams::default());
        assert_eq!(l.standoff_height, 2.0);
        assert_eq!(l.pcb_bottom_z, 2.0);
    }

    #[test]
    fn board_corners_map_to_case_quadrants() {
        let l = CaseLayout::new(&schema(1.0), CaseParams::default());
        assert_eq!(l.to_case_xy(0.0, 0.0), (-40.0, 30.0));
        assert_eq!(l.to_case_xy(80.0, 60.0), (40.0, -30.0));
        assert_eq!(l.to_case_xy(40.0, 30.0), (0.0, 0.0));
    }

    #[test]
    fn posts_sit_on_the_floor() {
        let l = CaseLayout::new(&schema(1.0), CaseParams::default());
        let post = l.posts[0];
        assert_eq!(post.center, [-35.0, 25.0]);
        assert!((post.post_radius - 2.6).abs() < 1e-12);
        assert!((post.bore_radius - 1.6).abs() < 1e-12);
        assert_eq!(post.base_z, 2.0);
        assert_eq!(post.center_z(), 2.5);
        assert!((post.bore_length - 1.2).abs() < 1e-12);
    }

    #[test]
    fn cutouts_straddle_the_outer_face() {
        let mut s = schema(1.0);
        s.pcb.connectors = vec![
            connector(Some(EdgeSide::Top), 40.0, 0.0),
            connector(Some(EdgeSide::Left), 0.0, 30.0),
            connector(None, 10.0, 10.0),
        ];
        let l = CaseLayout::new(&s, CaseParams::default());
        assert_eq!(l.cutouts.len(), 2);
        assert_eq!(l.unplaced_connectors, vec!["J1".to_string()]);

        let top = &l.cutouts[0];
        assert_eq!(top.edge, EdgeSide::Top);
        assert_eq!(top.center[0], 0.0);
        assert_eq!(top.center[1], 33.0);
        assert!((top.center[2] - 6.2).abs() < 1e-12);
        assert!((top.size[0] - 11.0).abs() < 1e-12);
        assert_eq!(top.size[1], 6.0);
        assert!((top.size[2] - 5.2).abs() < 1e-12);

        let left = &l.cutouts[1];
        assert_eq!(left.center[0], -43.0);
        assert_eq!(left.center[1], 0.0);
        assert_eq!(left.size[0], 6.0);
        assert!((left.size[1] - 11.0).abs() < 1e-12);
    }

    #[test]
    fn margins_are_configurable() {
        let params = CaseParams {
            post_diameter_margin: 4.0,
            min_standoff: 3.0,
            ..CaseParams::default()
        };
        let l = CaseLayout::new(&schema(0.0), params);
        assert!((l.posts[0].post_radius - 3.6).abs() < 1e-12);
        assert_eq!(l.standoff_height, 3.0);
    }
}
