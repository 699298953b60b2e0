use std::path::Path;

use crate::errors::SaveError;
use crate::types::FissionSchema;

/// Highest schema major version this crate reads.
pub const SUPPORTED_MAJOR_VERSION: u32 = 1;

/// Serialize a schema to a pretty-printed JSON string.
pub fn save_schema(schema: &FissionSchema) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Serialize a schema and write it to `path`.
pub fn save_schema_file(schema: &FissionSchema, path: &Path) -> Result<(), SaveError> {
    let json = save_schema(schema)?;
    std::fs::write(path, json).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}
