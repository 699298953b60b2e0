//! The board + enclosure data model.
//!
//! Board-space coordinates have their origin at the outline's top-left
//! corner with Y growing downward. Every length is in millimetres.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;
use crate::units::{FiniteMm, NonNegativeMm, PositiveMm};

/// Current schema document version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Default board thickness for a standard FR-4 panel.
pub const DEFAULT_BOARD_THICKNESS: f64 = 1.6;

/// A point in board space. `z` is the height above the board's top face.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position3D {
    pub x: FiniteMm,
    pub y: FiniteMm,
    #[serde(default)]
    pub z: FiniteMm,
}

impl Position3D {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, SchemaError> {
        Ok(Self {
            x: FiniteMm::new(x)?,
            y: FiniteMm::new(y)?,
            z: FiniteMm::new(z)?,
        })
    }
}

/// Physical size of a connector body: width along X, height along Z,
/// depth along Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions3D {
    pub width: PositiveMm,
    pub height: PositiveMm,
    pub depth: PositiveMm,
}

impl Dimensions3D {
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self, SchemaError> {
        Ok(Self {
            width: PositiveMm::new(width)?,
            height: PositiveMm::new(height)?,
            depth: PositiveMm::new(depth)?,
        })
    }
}

/// Axis-aligned board outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardOutline {
    pub width: PositiveMm,
    pub length: PositiveMm,
    #[serde(default = "default_thickness")]
    pub thickness: PositiveMm,
}

fn default_thickness() -> PositiveMm {
    PositiveMm::literal(DEFAULT_BOARD_THICKNESS)
}

impl BoardOutline {
    pub fn new(width: f64, length: f64, thickness: f64) -> Result<Self, SchemaError> {
        Ok(Self {
            width: PositiveMm::new(width)?,
            length: PositiveMm::new(length)?,
            thickness: PositiveMm::new(thickness)?,
        })
    }
}

/// A mounting hole. Each hole becomes one post plus one bore in the case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MountHole {
    pub x: FiniteMm,
    pub y: FiniteMm,
    pub diameter: PositiveMm,
}

impl MountHole {
    pub fn new(x: f64, y: f64, diameter: f64) -> Result<Self, SchemaError> {
        Ok(Self {
            x: FiniteMm::new(x)?,
            y: FiniteMm::new(y)?,
            diameter: PositiveMm::new(diameter)?,
        })
    }
}

/// The enclosure wall a connector cutout pierces, in board-space orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl EdgeSide {
    /// All sides, in the fixed order used to break distance ties.
    pub const ALL: [EdgeSide; 4] = [
        EdgeSide::Top,
        EdgeSide::Bottom,
        EdgeSide::Left,
        EdgeSide::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeSide::Top => "top",
            EdgeSide::Bottom => "bottom",
            EdgeSide::Left => "left",
            EdgeSide::Right => "right",
        }
    }

    /// Distance from a board-space point to this edge of the outline.
    pub fn distance(self, outline: &BoardOutline, x: f64, y: f64) -> f64 {
        match self {
            EdgeSide::Top => y,
            EdgeSide::Bottom => outline.length.get() - y,
            EdgeSide::Left => x,
            EdgeSide::Right => outline.width.get() - x,
        }
    }

    /// The edge closest to a board-space point. Ties resolve in
    /// [`EdgeSide::ALL`] order.
    pub fn closest(outline: &BoardOutline, x: f64, y: f64) -> (EdgeSide, f64) {
        let mut best = (EdgeSide::Top, EdgeSide::Top.distance(outline, x, y));
        for side in &EdgeSide::ALL[1..] {
            let d = side.distance(outline, x, y);
            if d < best.1 {
                best = (*side, d);
            }
        }
        best
    }
}

impl fmt::Display for EdgeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeSide {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(EdgeSide::Top),
            "bottom" => Ok(EdgeSide::Bottom),
            "left" => Ok(EdgeSide::Left),
            "right" => Ok(EdgeSide::Right),
            other => Err(SchemaError::InvalidField {
                field: "edge",
                reason: format!("unknown edge side {other:?}"),
            }),
        }
    }
}

/// A board-mounted connector.
///
/// `edge == None` means the connector gets no cutout. The generator skips it
/// and the verification pipeline reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub position: Position3D,
    pub dimensions: Dimensions3D,
    #[serde(default)]
    pub edge: Option<EdgeSide>,
}

impl Connector {
    pub fn new(
        kind: impl Into<String>,
        position: Position3D,
        dimensions: Dimensions3D,
        edge: Option<EdgeSide>,
    ) -> Self {
        Self {
            kind: kind.into(),
            reference: None,
            position,
            dimensions,
            edge,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Human-facing name: the reference designator if set, else the type.
    pub fn label(&self) -> &str {
        match self.reference.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => &self.kind,
        }
    }
}

/// Tallest component above and below the board.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentHeight {
    #[serde(default)]
    pub top: NonNegativeMm,
    #[serde(default)]
    pub bottom: NonNegativeMm,
}

impl ComponentHeight {
    pub fn new(top: f64, bottom: f64) -> Result<Self, SchemaError> {
        Ok(Self {
            top: NonNegativeMm::new(top)?,
            bottom: NonNegativeMm::new(bottom)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbData {
    pub outline: BoardOutline,
    #[serde(default)]
    pub mount_holes: Vec<MountHole>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub max_component_height: ComponentHeight,
}

impl PcbData {
    pub fn new(outline: BoardOutline) -> Self {
        Self {
            outline,
            mount_holes: Vec::new(),
            connectors: Vec::new(),
            max_component_height: ComponentHeight::default(),
        }
    }
}

/// How the case is divided into printable shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    #[default]
    Horizontal,
    Vertical,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitType::Horizontal => f.write_str("horizontal"),
            SplitType::Vertical => f.write_str("vertical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnclosureConfig {
    #[serde(default = "default_wall")]
    pub wall_thickness: PositiveMm,
    #[serde(default = "default_clearance")]
    pub clearance: NonNegativeMm,
    #[serde(default = "default_material")]
    pub material: String,
    #[serde(default)]
    pub split: SplitType,
}

fn default_wall() -> PositiveMm {
    PositiveMm::literal(2.0)
}

fn default_clearance() -> NonNegativeMm {
    NonNegativeMm::literal(1.0)
}

fn default_material() -> String {
    "PLA".to_string()
}

impl Default for EnclosureConfig {
    fn default() -> Self {
        Self {
            wall_thickness: default_wall(),
            clearance: default_clearance(),
            material: default_material(),
            split: SplitType::Horizontal,
        }
    }
}

impl EnclosureConfig {
    pub fn new(wall_thickness: f64, clearance: f64) -> Result<Self, SchemaError> {
        Ok(Self {
            wall_thickness: PositiveMm::new(wall_thickness)?,
            clearance: NonNegativeMm::new(clearance)?,
            ..Self::default()
        })
    }
}

/// One board and the enclosure built around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FissionSchema {
    #[serde(default = "default_version")]
    pub schema_version: String,
    pub project: String,
    pub pcb: PcbData,
    #[serde(default)]
    pub enclosure: EnclosureConfig,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl FissionSchema {
    pub fn new(project: impl Into<String>, pcb: PcbData) -> Self {
        Self {
            schema_version: default_version(),
            project: project.into(),
            pcb,
            enclosure: EnclosureConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> BoardOutline {
        BoardOutline::new(80.0, 60.0, 1.6).unwrap()
    }

    #[test]
    fn closest_edge_prefers_smallest_distance() {
        let o = outline();
        assert_eq!(EdgeSide::closest(&o, 40.0, 0.0).0, EdgeSide::Top);
        assert_eq!(EdgeSide::closest(&o, 40.0, 59.0).0, EdgeSide::Bottom);
        assert_eq!(EdgeSide::closest(&o, 1.0, 30.0).0, EdgeSide::Left);
        assert_eq!(EdgeSide::closest(&o, 78.0, 30.0).0, EdgeSide::Right);
    }

    #[test]
    fn closest_edge_ties_follow_fixed_order() {
        let o = outline();
        // Equidistant from top and left.
        assert_eq!(EdgeSide::closest(&o, 5.0, 5.0).0, EdgeSide::Top);
        // Equidistant from bottom and right.
        assert_eq!(EdgeSide::closest(&o, 75.0, 55.0).0, EdgeSide::Bottom);
    }

    #[test]
    fn edge_side_parses_only_known_names() {
        assert_eq!("left".parse::<EdgeSide>().unwrap(), EdgeSide::Left);
        assert!("north".parse::<EdgeSide>().is_err());
        assert!("Top".parse::<EdgeSide>().is_err());
    }

    #[test]
    fn label_falls_back_to_type() {
        let dims = Dimensions3D::new(9.0, 3.2, 7.5).unwrap();
        let c = Connector::new("USB-C", Position3D::default(), dims, None);
        assert_eq!(c.label(), "USB-C");
        assert_eq!(c.clone().with_reference("J1").label(), "J1");
        assert_eq!(c.with_reference("").label(), "USB-C");
    }
}
