//! Pass 3: Type Conversion
//!
//! Rewrites every node of the dialect tree into a target node. The JSON
//! Schema target wraps array-typed fields as `{type: array, items: ...}` and
//! copies `documentation` into `description`. The search-mapping target types
//! a field by its element kind only and carries no descriptions: search
//! engines index scalars and arrays of scalars identically.

use serde_json::{json, Map, Value};

use crate::config::Target;
use crate::data_type::{DataKind, DataType};
use crate::error::ConvertError;
use crate::passes::p1_paths::ARRAY_MARKER;
use crate::passes::p2_tree::DialectNode;

/// Convert the children of `tree` into a target properties mapping.
///
/// `root` prefixes the dotted paths reported in errors.
pub fn convert_tree(tree: &DialectNode, root: &str, target: Target) -> Result<Value, ConvertError> {
    let mut properties = Map::new();
    for (key, child) in &tree.children {
        let path = format!("{root}.{key}");
        properties.insert(key.clone(), convert_node(child, &path, target)?);
    }
    Ok(Value::Object(properties))
}

/// Convert a single dialect node (and everything below it).
///
/// Metadata declared on the `[:]` element itself is honoured: its data type
/// must agree with the field's kind (or stands in for it when the field is
/// undeclared), and its documentation describes the items.
pub fn convert_node(node: &DialectNode, path: &str, target: Target) -> Result<Value, ConvertError> {
    let element_decl = node
        .element
        .as_deref()
        .filter(|element| !element.metadata.is_empty());
    let data_type = resolve_type(node, element_decl, path)?;

    if node.element.is_some() && !data_type.is_array {
        return Err(ConvertError::malformed_path(
            format!("{path}{ARRAY_MARKER}"),
            "array marker on a field whose data type is not an array",
        ));
    }
    if !data_type.kind.is_object() && (!node.children.is_empty() || has_element_children(node)) {
        tracing::warn!(path = %path, "ignoring children of a non-structure field");
    }

    let mut element = Map::new();
    element.insert(
        "type".to_string(),
        Value::String(data_type.kind.type_name(target).to_string()),
    );
    match data_type.kind {
        DataKind::Structure => {
            element.insert("properties".to_string(), structure_properties(node, path, target)?);
        }
        DataKind::Complex => {
            let part = json!({ "type": DataKind::Float.type_name(target) });
            element.insert(
                "properties".to_string(),
                json!({ "imag": part.clone(), "real": part }),
            );
        }
        _ => {}
    }

    match target {
        Target::SearchMapping => Ok(Value::Object(element)),
        Target::JsonSchema => {
            // An undeclared field borrows the element's documentation.
            let item_doc = element_decl.and_then(DialectNode::documentation);
            let (description, item_description) = match node.documentation() {
                Some(own) => (Some(own), item_doc),
                None => (item_doc, None),
            };

            let mut converted = if data_type.is_array {
                if let Some(doc) = item_description {
                    element.insert("description".to_string(), Value::String(doc.to_string()));
                }
                let mut array = Map::new();
                array.insert("type".to_string(), Value::String("array".to_string()));
                array.insert("items".to_string(), Value::Object(element));
                array
            } else {
                element
            };
            if let Some(doc) = description {
                converted.insert("description".to_string(), Value::String(doc.to_string()));
            }
            Ok(Value::Object(converted))
        }
    }
}

/// Resolve the node's data type from its own declaration, the declaration on
/// its `[:]` element, or (for undeclared intermediate nodes) its shape.
fn resolve_type(
    node: &DialectNode,
    element_decl: Option<&DialectNode>,
    path: &str,
) -> Result<DataType, ConvertError> {
    let item_path = format!("{path}{ARRAY_MARKER}");
    let declared = node
        .data_type()
        .map(|code| parse_code(code, path))
        .transpose()?;
    let item_declared = element_decl
        .and_then(DialectNode::data_type)
        .map(|code| parse_code(code, &item_path))
        .transpose()?;

    match (declared, item_declared) {
        (Some(own), Some(item)) if own.kind != item.kind => Err(ConvertError::consistency(
            item_path,
            format!(
                "element declared as {:?} but the field is {:?}",
                item.kind, own.kind
            ),
        )),
        (Some(own), _) => Ok(own),
        (None, Some(item)) => Ok(DataType {
            kind: item.kind,
            is_array: true,
        }),
        (None, None) if !node.children.is_empty() || node.element.is_some() => Ok(DataType {
            kind: DataKind::Structure,
            is_array: node.element.is_some(),
        }),
        (None, None) => Err(ConvertError::UnknownType {
            path: path.to_string(),
            data_type: "<missing>".to_string(),
        }),
    }
}

fn parse_code(code: &Value, path: &str) -> Result<DataType, ConvertError> {
    match code {
        Value::String(code) => DataType::parse(code, path),
        other => Err(ConvertError::UnknownType {
            path: path.to_string(),
            data_type: other.to_string(),
        }),
    }
}

fn has_element_children(node: &DialectNode) -> bool {
    node.element
        .as_ref()
        .is_some_and(|element| !element.children.is_empty())
}

/// Properties of a structure: its direct children, plus the children of
/// its element node when it is an array of structures.
fn structure_properties(
    node: &DialectNode,
    path: &str,
    target: Target,
) -> Result<Value, ConvertError> {
    let mut properties = Map::new();
    for (key, child) in &node.children {
        let child_path = format!("{path}.{key}");
        properties.insert(key.clone(), convert_node(child, &child_path, target)?);
    }
    if let Some(element) = &node.element {
        for (key, child) in &element.children {
            let child_path = format!("{path}{ARRAY_MARKER}.{key}");
            if properties.contains_key(key) {
                return Err(ConvertError::consistency(
                    child_path,
                    "field declared both on the array and on its elements",
                ));
            }
            properties.insert(key.clone(), convert_node(child, &child_path, target)?);
        }
    }
    Ok(Value::Object(properties))
}
