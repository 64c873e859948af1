//! Pass 0: Pruning
//!
//! Drops every entry whose dotted path contains a denylisted substring, then
//! applies the registered one-off data type fixes. Both steps mutate the
//! entry map in place and are idempotent.

use serde_json::{Map, Value};

use crate::config::PruneTables;

/// Summary of a pruning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Paths removed by the denylist.
    pub dropped: Vec<String>,
    /// Fix paths that were applied.
    pub fixed: Vec<String>,
}

/// Whether `path` contains any denylisted substring.
pub fn is_denied(path: &str, denylist: &[String]) -> bool {
    denylist.iter().any(|bad| path.contains(bad.as_str()))
}

/// Apply the denylist and the fixes to `entries`.
pub fn prune(entries: &mut Map<String, Value>, tables: &PruneTables) -> PruneReport {
    let dropped: Vec<String> = entries
        .keys()
        .filter(|key| is_denied(key, &tables.denylist))
        .cloned()
        .collect();
    for key in &dropped {
        entries.remove(key);
    }

    let mut fixed = Vec::new();
    for fix in &tables.fixes {
        match entries.get_mut(&fix.path).and_then(Value::as_object_mut) {
            Some(meta) => {
                meta.insert(
                    "data_type".to_string(),
                    Value::String(fix.data_type.clone()),
                );
                fixed.push(fix.path.clone());
            }
            None => tracing::debug!(path = %fix.path, "fix target absent, skipping"),
        }
    }

    tracing::debug!(
        dropped = dropped.len(),
        fixed = fixed.len(),
        remaining = entries.len(),
        "pruned dialect entries"
    );
    PruneReport { dropped, fixed }
}
