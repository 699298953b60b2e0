//! Targeted edits to a schema's enclosure settings.

use tracing::info;

use crate::errors::SchemaError;
use crate::types::FissionSchema;
use crate::units::{NonNegativeMm, PositiveMm};

/// Enclosure fields to replace. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnclosureOverrides {
    pub wall_thickness: Option<f64>,
    pub clearance: Option<f64>,
    pub material: Option<String>,
}

impl EnclosureOverrides {
    pub fn is_empty(&self) -> bool {
        self.wall_thickness.is_none() && self.clearance.is_none() && self.material.is_none()
    }

    /// Apply the overrides. Every value is validated first; on error the
    /// schema is left unchanged.
    pub fn apply(&self, schema: &mut FissionSchema) -> Result<(), SchemaError> {
        let wall = self.wall_thickness.map(PositiveMm::new).transpose()?;
        let clearance = self.clearance.map(NonNegativeMm::new).transpose()?;
        if let Some(material) = &self.material {
            if material.trim().is_empty() {
                return Err(SchemaError::InvalidField {
                    field: "material",
                    reason: "must not be empty".to_string(),
                });
            }
        }

        let enclosure = &mut schema.enclosure;
        if let Some(wall) = wall {
            enclosure.wall_thickness = wall;
        }
        if let Some(clearance) = clearance {
            enclosure.clearance = clearance;
        }
        if let Some(material) = &self.material {
            enclosure.material = material.clone();
        }
        info!(
            wall_thickness = enclosure.wall_thickness.get(),
            clearance = enclosure.clearance.get(),
            material = %enclosure.material,
            "enclosure config updated"
        );
        Ok(())
    }
}
