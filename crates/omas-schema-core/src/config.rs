//! Configuration for schema conversion.

use serde::{Deserialize, Serialize};

/// Root entry of the OMAS gyrokinetics IDS.
pub const DEFAULT_ROOT: &str = "gyrokinetics";

/// Levels a node may sit below the root (stack overflow guard).
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Path substrings excluded from every conversion.
///
/// Matching is by substring, not by path component: `error` drops
/// `error_bars` and `sawtooth_error` alike.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "b_field_parallel",
    "collisions_",
    "dr_minor_norm",
    "energy_",
    "error",
    "fluxes_moments",
    "fluxes_norm_particle",
    "growth_rate_tolerance",
    "ids_properties",
    "moments_norm_gyrocenter",
    "moments_norm_particle",
    "momentum_tor",
    "perturbed_norm",
    "perturbed_parity",
    "perturbed_weight",
    "poloidal_angle",
    "shape_coefficients",
    "time_norm",
];

/// Metadata keys that never denote a child node.
pub const IGNORED_METADATA: &[&str] = &[
    "coordinates",
    "data_type",
    "documentation",
    "full_path",
    "lifecycle_status",
    "lifecycle_version",
    "maxoccur",
    "structure_reference",
    "type",
];

/// Conversion target for the type converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Nested JSON Schema properties with descriptions.
    JsonSchema,
    /// Elasticsearch/OpenSearch mapping properties.
    /// Arrays are typed by their element kind; descriptions are dropped.
    SearchMapping,
}

/// A one-off override of a field's declared data type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldFix {
    /// Full dotted path, exactly as it appears in the dialect document.
    pub path: String,
    /// Data type code written over the declared one.
    pub data_type: String,
}

/// Tables driving the pruner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PruneTables {
    pub denylist: Vec<String>,
    pub fixes: Vec<FieldFix>,
}

impl Default for PruneTables {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            fixes: vec![
                // INT_ elsewhere means a flag; this one is a real count.
                FieldFix {
                    path: "gyrokinetics.wavevector[:].poloidal_turns".to_string(),
                    data_type: "FLT_0D".to_string(),
                },
            ],
        }
    }
}

impl PruneTables {
    /// Tables that neither drop nor rewrite anything.
    pub fn empty() -> Self {
        Self {
            denylist: Vec::new(),
            fixes: Vec::new(),
        }
    }
}

/// Options for schema conversion.
///
/// Fields are serialized in `kebab-case` (e.g., `prune.denylist`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConvertOptions {
    /// Target representation. Default: JSON Schema.
    pub target: Target,
    /// Root entry removed by the loader and stripped from every path.
    pub root: String,
    /// Denylist and fix tables applied before tree assembly.
    pub prune: PruneTables,
    /// Maximum tree depth below the root, counting `[:]` levels and inline
    /// children (stack overflow guard). Default: 50.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target: Target::JsonSchema,
            root: DEFAULT_ROOT.to_string(),
            prune: PruneTables::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOptions {
    pub fn with_target(target: Target) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }
}
