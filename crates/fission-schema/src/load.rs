use std::path::Path;

use tracing::{debug, instrument};

use crate::errors::LoadError;
use crate::save::SUPPORTED_MAJOR_VERSION;
use crate::types::FissionSchema;

/// Deserialize a schema from a JSON string.
///
/// Field-level invariants are enforced by the schema types themselves, so a
/// successful parse yields a valid schema. The document's major version must
/// not be newer than the supported one.
pub fn load_schema(json: &str) -> Result<FissionSchema, LoadError> {
    let schema: FissionSchema =
        serde_json::from_str(json).map_err(|e| LoadError::Parse(e.to_string()))?;

    let major = major_version(&schema.schema_version)?;
    if major > SUPPORTED_MAJOR_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: schema.schema_version,
            supported_version: format!("{SUPPORTED_MAJOR_VERSION}.x"),
        });
    }

    Ok(schema)
}

/// Read and deserialize a schema file. Only `.json` documents are accepted.
#[instrument]
pub fn load_schema_file(path: &Path) -> Result<FissionSchema, LoadError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(LoadError::UnsupportedFormat(path.display().to_string()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = load_schema(&text)?;
    debug!(
        project = %schema.project,
        holes = schema.pcb.mount_holes.len(),
        connectors = schema.pcb.connectors.len(),
        "schema loaded"
    );
    Ok(schema)
}

fn major_version(version: &str) -> Result<u32, LoadError> {
    version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse::<u32>().ok())
        .ok_or_else(|| LoadError::InvalidVersion(version.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_version_parsing() {
        assert_eq!(major_version("1.0").unwrap(), 1);
        assert_eq!(major_version("2").unwrap(), 2);
        assert!(major_version("v1").is_err());
        assert!(major_version("").is_err());
    }
}
