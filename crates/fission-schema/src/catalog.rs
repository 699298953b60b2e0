//! Well-known connector categories, their default body sizes, and the
//! helpers a board parser uses to populate [`Connector`] values.

use std::fmt;

use crate::types::{BoardOutline, Connector, Dimensions3D, EdgeSide, Position3D};
use crate::units::PositiveMm;

/// Connectors further than this from every edge get no edge assignment.
pub const EDGE_MARGIN_MM: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    UsbC,
    UsbA,
    UsbMicro,
    UsbMini,
    Hdmi,
    Rj45,
    DcJack,
    PinHeader,
    Jst,
    SdCard,
    Unknown,
}

impl ConnectorKind {
    /// Categories in match priority order.
    const KNOWN: [ConnectorKind; 10] = [
        ConnectorKind::UsbC,
        ConnectorKind::UsbA,
        ConnectorKind::UsbMicro,
        ConnectorKind::UsbMini,
        ConnectorKind::Hdmi,
        ConnectorKind::Rj45,
        ConnectorKind::DcJack,
        ConnectorKind::PinHeader,
        ConnectorKind::Jst,
        ConnectorKind::SdCard,
    ];

    /// Wire name stored in `Connector::kind`.
    pub fn name(self) -> &'static str {
        match self {
            ConnectorKind::UsbC => "USB-C",
            ConnectorKind::UsbA => "USB-A",
            ConnectorKind::UsbMicro => "USB-Micro",
            ConnectorKind::UsbMini => "USB-Mini",
            ConnectorKind::Hdmi => "HDMI",
            ConnectorKind::Rj45 => "RJ45",
            ConnectorKind::DcJack => "DC-Jack",
            ConnectorKind::PinHeader => "Pin-Header",
            ConnectorKind::Jst => "JST",
            ConnectorKind::SdCard => "SD-Card",
            ConnectorKind::Unknown => "Unknown",
        }
    }

    /// Footprint-name fragments identifying this category.
    fn patterns(self) -> &'static [&'static str] {
        match self {
            ConnectorKind::UsbC => &["USB_C", "Type-C", "TypeC"],
            ConnectorKind::UsbA => &["USB_A", "Type-A", "TypeA"],
            ConnectorKind::UsbMicro => &["USB_Micro", "Micro_USB", "MicroUSB"],
            ConnectorKind::UsbMini => &["USB_Mini", "Mini_USB", "MiniUSB"],
            ConnectorKind::Hdmi => &["HDMI"],
            ConnectorKind::Rj45 => &["RJ45", "8P8C"],
            ConnectorKind::DcJack => &["Jack_DC", "BarrelJack", "DC_Jack"],
            ConnectorKind::PinHeader => &["PinHeader", "Pin_Header"],
            ConnectorKind::Jst => &["JST"],
            ConnectorKind::SdCard => &["SD_Card", "microSD", "MicroSD"],
            ConnectorKind::Unknown => &[],
        }
    }

    /// Default body size as (width, height, depth).
    pub fn default_size(self) -> (f64, f64, f64) {
        match self {
            ConnectorKind::UsbC => (9.0, 3.2, 7.5),
            ConnectorKind::UsbA => (14.0, 6.5, 14.0),
            ConnectorKind::UsbMicro => (8.0, 3.0, 5.5),
            ConnectorKind::UsbMini => (7.0, 4.0, 5.5),
            ConnectorKind::Hdmi => (15.0, 6.0, 11.2),
            ConnectorKind::Rj45 => (16.0, 13.5, 21.5),
            ConnectorKind::DcJack => (9.0, 11.0, 14.0),
            ConnectorKind::PinHeader => (2.54, 8.5, 2.54),
            ConnectorKind::Jst => (5.0, 4.5, 6.0),
            ConnectorKind::SdCard => (14.0, 2.0, 15.0),
            ConnectorKind::Unknown => (10.0, 5.0, 10.0),
        }
    }

    pub fn default_dimensions(self) -> Dimensions3D {
        let (w, h, d) = self.default_size();
        Dimensions3D {
            width: PositiveMm::literal(w),
            height: PositiveMm::literal(h),
            depth: PositiveMm::literal(d),
        }
    }

    /// Classify a footprint name. Generic "connector" footprints map to
    /// [`ConnectorKind::Unknown`]; anything else is not a connector.
    pub fn classify(footprint: &str) -> Option<ConnectorKind> {
        let lower = footprint.to_lowercase();
        for kind in Self::KNOWN {
            if kind
                .patterns()
                .iter()
                .any(|p| lower.contains(&p.to_lowercase()))
            {
                return Some(kind);
            }
        }
        lower.contains("connector").then_some(ConnectorKind::Unknown)
    }

    /// Look up a category by its wire name.
    pub fn from_name(name: &str) -> Option<ConnectorKind> {
        Self::KNOWN
            .into_iter()
            .chain(std::iter::once(ConnectorKind::Unknown))
            .find(|k| k.name() == name)
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closest board edge within [`EDGE_MARGIN_MM`], if any.
pub fn estimate_edge(outline: &BoardOutline, x: f64, y: f64) -> Option<EdgeSide> {
    let (side, distance) = EdgeSide::closest(outline, x, y);
    (distance <= EDGE_MARGIN_MM).then_some(side)
}

impl Connector {
    /// Build a connector with catalog dimensions and an estimated edge.
    pub fn from_catalog(kind: ConnectorKind, position: Position3D, outline: &BoardOutline) -> Self {
        let edge = estimate_edge(outline, position.x.get(), position.y.get());
        Connector::new(kind.name(), position, kind.default_dimensions(), edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(
            ConnectorKind::classify("Connector_USB:USB_C_Receptacle_GCT_USB4085"),
            Some(ConnectorKind::UsbC)
        );
        assert_eq!(ConnectorKind::classify("usb_c_smd"), Some(ConnectorKind::UsbC));
        assert_eq!(
            ConnectorKind::classify("Connector_Card:microSD_HC_Hirose_DM3AT"),
            Some(ConnectorKind::SdCard)
        );
        assert_eq!(
            ConnectorKind::classify("BarrelJack_Horizontal"),
            Some(ConnectorKind::DcJack)
        );
    }

    #[test]
    fn classify_generic_and_unrelated() {
        assert_eq!(
            ConnectorKind::classify("Connector_Generic:Conn_01x02"),
            Some(ConnectorKind::Unknown)
        );
        assert_eq!(ConnectorKind::classify("Resistor_SMD:R_0603"), None);
    }

    #[test]
    fn catalog_sizes() {
        assert_eq!(ConnectorKind::UsbC.default_size(), (9.0, 3.2, 7.5));
        assert_eq!(ConnectorKind::Rj45.default_size(), (16.0, 13.5, 21.5));
        assert_eq!(ConnectorKind::Unknown.default_size(), (10.0, 5.0, 10.0));
        assert_eq!(ConnectorKind::from_name("HDMI"), Some(ConnectorKind::Hdmi));
        assert_eq!(ConnectorKind::from_name("hdmi"), None);
    }

    #[test]
    fn edge_estimate_respects_margin() {
        let outline = BoardOutline::new(80.0, 60.0, 1.6).unwrap();
        assert_eq!(estimate_edge(&outline, 40.0, 0.0), Some(EdgeSide::Top));
        assert_eq!(estimate_edge(&outline, 40.0, 3.0), Some(EdgeSide::Top));
        assert_eq!(estimate_edge(&outline, 79.0, 30.0), Some(EdgeSide::Right));
        assert_eq!(estimate_edge(&outline, 40.0, 30.0), None);
    }

    #[test]
    fn from_catalog_fills_dimensions_and_edge() {
        let outline = BoardOutline::new(80.0, 60.0, 1.6).unwrap();
        let c = Connector::from_catalog(
            ConnectorKind::UsbC,
            Position3D::new(40.0, 0.5, 1.6).unwrap(),
            &outline,
        );
        assert_eq!(c.kind, "USB-C");
        assert_eq!(c.dimensions.width.get(), 9.0);
        assert_eq!(c.edge, Some(EdgeSide::Top));
    }
}
