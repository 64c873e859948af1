//! Schema loading: read the flat dialect document and strip its root entry.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ConvertError;

/// A loaded dialect document: dotted path → metadata mapping.
///
/// The root entry itself has been removed; every key in `entries` is still
/// prefixed with `root` (e.g. `gyrokinetics.flux_surface.q`).
#[derive(Debug, Clone, PartialEq)]
pub struct DialectSchema {
    pub root: String,
    pub entries: Map<String, Value>,
}

/// Read and validate a dialect document from disk.
pub fn load_schema(path: &Path, root: &str) -> Result<DialectSchema, ConvertError> {
    let source = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ConvertError::Load {
        path: source.clone(),
        message: e.to_string(),
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|e| ConvertError::Load {
        path: source.clone(),
        message: format!("invalid JSON: {e}"),
    })?;
    tracing::debug!(path = %source, "loaded dialect document");
    from_value(document, root, &source)
}

/// Validate an already-parsed dialect document.
///
/// `source` only labels errors (a file path, or `<memory>`).
pub fn from_value(document: Value, root: &str, source: &str) -> Result<DialectSchema, ConvertError> {
    let Value::Object(mut entries) = document else {
        return Err(ConvertError::Load {
            path: source.to_string(),
            message: "top level is not a mapping of dotted paths".to_string(),
        });
    };

    if entries.remove(root).is_none() {
        return Err(ConvertError::Load {
            path: source.to_string(),
            message: format!("missing root entry '{root}'"),
        });
    }

    if let Some((key, _)) = entries.iter().find(|(_, v)| !v.is_object()) {
        return Err(ConvertError::Load {
            path: source.to_string(),
            message: format!("entry '{key}' is not a metadata mapping"),
        });
    }

    Ok(DialectSchema {
        root: root.to_string(),
        entries,
    })
}
