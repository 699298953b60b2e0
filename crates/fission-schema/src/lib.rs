//! Board and enclosure description shared by the case generator and the
//! verification pipeline.

pub mod catalog;
pub mod errors;
pub mod load;
pub mod overrides;
pub mod save;
pub mod types;
pub mod units;

pub use catalog::{estimate_edge, ConnectorKind, EDGE_MARGIN_MM};
pub use errors::{LoadError, SaveError, SchemaError};
pub use load::{load_schema, load_schema_file};
pub use overrides::EnclosureOverrides;
pub use save::{save_schema, save_schema_file, SUPPORTED_MAJOR_VERSION};
pub use types::*;
pub use units::{FiniteMm, NonNegativeMm, PositiveMm};
