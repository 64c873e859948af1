//! Pass 2: Tree Assembly
//!
//! Builds the nested dialect tree from the pruned flat entries. Each entry's
//! path is normalized (Pass 1), the root component is stripped, and the
//! entry's metadata is merged into the node at that path. Intermediate nodes
//! are created on demand, so entries may arrive in any order.
//!
//! Metadata values that are themselves mappings (under keys outside
//! [`IGNORED_METADATA`]) are inline children and are merged the same way.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::IGNORED_METADATA;
use crate::error::ConvertError;
use crate::passes::p1_paths::{normalize_path, to_dotted, PathComponent};

/// A node of the nested dialect tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialectNode {
    /// Scalar metadata (`data_type`, `documentation`, ...).
    pub metadata: Map<String, Value>,
    /// Named children, sorted by key.
    pub children: BTreeMap<String, DialectNode>,
    /// Element node introduced by the `[:]` marker.
    pub element: Option<Box<DialectNode>>,
}

impl DialectNode {
    /// Follow `components` from this node.
    pub fn get(&self, components: &[PathComponent]) -> Option<&DialectNode> {
        components
            .iter()
            .try_fold(self, |node, component| match component {
                PathComponent::Field(name) => node.children.get(name),
                PathComponent::Items => node.element.as_deref(),
            })
    }

    /// The declared data type code, if any.
    pub fn data_type(&self) -> Option<&Value> {
        self.metadata.get("data_type")
    }

    pub fn documentation(&self) -> Option<&str> {
        self.metadata
            .get("documentation")
            .and_then(Value::as_str)
            .filter(|doc| !doc.is_empty())
    }

    /// Whether nothing was declared at or below this node.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.children.is_empty() && self.element.is_none()
    }

    /// Step into (creating if needed) the node at `component`.
    ///
    /// Returns `None` when a named step would pass through a metadata value.
    fn descend_mut(&mut self, component: &PathComponent) -> Option<&mut DialectNode> {
        match component {
            PathComponent::Field(name) if self.metadata.contains_key(name) => None,
            PathComponent::Field(name) => Some(self.children.entry(name.clone()).or_default()),
            PathComponent::Items => Some(self.element.get_or_insert_with(Box::default)),
        }
    }

    /// Merge an entry's metadata mapping into this node, which sits `depth`
    /// levels below the root.
    fn merge(
        &mut self,
        value: &Map<String, Value>,
        path: &str,
        depth: usize,
        max_depth: usize,
    ) -> Result<(), ConvertError> {
        for (key, val) in value {
            let inline_child = match val {
                Value::Object(map) if !IGNORED_METADATA.contains(&key.as_str()) => Some(map),
                _ => None,
            };
            match inline_child {
                Some(map) => {
                    if depth >= max_depth {
                        return Err(ConvertError::RecursionDepthExceeded {
                            path: format!("{path}.{key}"),
                            max_depth,
                        });
                    }
                    if self.metadata.contains_key(key) {
                        return Err(ConvertError::consistency(
                            format!("{path}.{key}"),
                            "child node collides with a metadata value",
                        ));
                    }
                    self.children
                        .entry(key.clone())
                        .or_default()
                        .merge(map, &format!("{path}.{key}"), depth + 1, max_depth)?;
                }
                None => {
                    if self.children.contains_key(key) {
                        return Err(ConvertError::consistency(
                            format!("{path}.{key}"),
                            "metadata value would overwrite a child node",
                        ));
                    }
                    if let Some(existing) = self.metadata.get(key) {
                        if existing != val {
                            return Err(ConvertError::consistency(
                                path,
                                format!("conflicting values for metadata key '{key}'"),
                            ));
                        }
                    }
                    self.metadata.insert(key.clone(), val.clone());
                }
            }
        }
        Ok(())
    }
}

/// Assemble the nested tree below `root` from flat `entries`.
///
/// Every entry must be a metadata mapping whose path starts with `root`.
/// No node may sit more than `max_depth` levels below the root; each `[:]`
/// marker counts as a level.
pub fn build_tree(
    root: &str,
    entries: &Map<String, Value>,
    max_depth: usize,
) -> Result<DialectNode, ConvertError> {
    let mut tree = DialectNode::default();

    for (path, value) in entries {
        let components = normalize_path(path)?;
        let rest = match components.split_first() {
            Some((PathComponent::Field(first), rest)) if first == root && !rest.is_empty() => rest,
            _ => {
                return Err(ConvertError::malformed_path(
                    path.as_str(),
                    format!("path is not below root '{root}'"),
                ))
            }
        };
        if rest.len() > max_depth {
            return Err(ConvertError::RecursionDepthExceeded {
                path: to_dotted(&components[..max_depth + 2]),
                max_depth,
            });
        }
        if rest[0] == PathComponent::Items {
            return Err(ConvertError::malformed_path(
                path.as_str(),
                "array marker on the root entry",
            ));
        }

        let meta = value.as_object().ok_or_else(|| {
            ConvertError::consistency(path.as_str(), "entry is not a metadata mapping")
        })?;

        let mut node = &mut tree;
        for (depth, component) in rest.iter().enumerate() {
            node = node.descend_mut(component).ok_or_else(|| {
                ConvertError::consistency(
                    to_dotted(&components[..depth + 2]),
                    "path descends through a metadata value",
                )
            })?;
        }
        node.merge(meta, path, rest.len(), max_depth)?;
    }

    tracing::debug!(
        entries = entries.len(),
        top_level = tree.children.len(),
        "assembled dialect tree"
    );
    Ok(tree)
}
