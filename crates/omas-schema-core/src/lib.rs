//! Recompile the flat OMAS gyrokinetics schema dialect into nested targets.
//!
//! The pipeline is a pure function of the loaded document and the options:
//!
//! 1. [`loader`] reads the dotted-path document and strips the root entry.
//! 2. [`passes::p0_prune`] drops denylisted paths and applies data type fixes.
//! 3. [`passes::p1_paths`] turns dotted paths into tree-insertion components.
//! 4. [`passes::p2_tree`] assembles the nested dialect tree.
//! 5. [`passes::p3_types`] converts it into JSON Schema or a search mapping.

pub mod config;
pub mod data_type;
pub mod error;
pub mod loader;
pub mod passes;

use std::path::Path;

use serde_json::Value;

pub use config::{ConvertOptions, FieldFix, PruneTables, Target};
pub use data_type::{DataKind, DataType};
pub use error::{ConvertError, ErrorCode};
pub use loader::{load_schema, DialectSchema};
pub use passes::p1_paths::{normalize_path, PathComponent};
pub use passes::p2_tree::{build_tree, DialectNode};

/// Convert a loaded dialect document into the target selected by `options`.
///
/// Returns the top-level properties mapping (field name → target node).
pub fn convert(schema: DialectSchema, options: &ConvertOptions) -> Result<Value, ConvertError> {
    let DialectSchema { root, mut entries } = schema;

    passes::p0_prune::prune(&mut entries, &options.prune);
    let tree = build_tree(&root, &entries, options.max_depth)?;
    let converted = passes::p3_types::convert_tree(&tree, &root, options.target)?;

    tracing::debug!(
        target_kind = ?options.target,
        fields = tree.children.len(),
        "converted dialect schema"
    );
    Ok(converted)
}

/// Load a dialect document from `path` and convert it.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<Value, ConvertError> {
    let schema = load_schema(path, &options.root)?;
    convert(schema, options)
}

/// Parse and convert an in-memory dialect document.
pub fn convert_value(document: Value, options: &ConvertOptions) -> Result<Value, ConvertError> {
    let schema = loader::from_value(document, &options.root, "<memory>")?;
    convert(schema, options)
}
