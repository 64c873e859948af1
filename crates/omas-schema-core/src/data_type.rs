//! Dialect data type codes (`FLT_1D`, `STRUCT_ARRAY`, `INT_0D`, ...).

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Target;
use crate::error::ConvertError;

static DIMENSION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[1-9]+D").expect("dimension marker pattern is valid"));

/// Coarse kind selected by the first four characters of a data type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// `STRU`: `STRUCTURE`, `STRUCT_ARRAY`.
    Structure,
    /// `STR_`
    String,
    /// `FLT_`
    Float,
    /// `INT_`: integers in this IDS are flags.
    Boolean,
    /// `CPX_`
    Complex,
    /// `cons`
    Constant,
}

impl DataKind {
    pub const ALL: [DataKind; 6] = [
        DataKind::Structure,
        DataKind::String,
        DataKind::Float,
        DataKind::Boolean,
        DataKind::Complex,
        DataKind::Constant,
    ];

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "STRU" => Some(DataKind::Structure),
            "STR_" => Some(DataKind::String),
            "FLT_" => Some(DataKind::Float),
            "INT_" => Some(DataKind::Boolean),
            "CPX_" => Some(DataKind::Complex),
            "cons" => Some(DataKind::Constant),
            _ => None,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            DataKind::Structure => "STRU",
            DataKind::String => "STR_",
            DataKind::Float => "FLT_",
            DataKind::Boolean => "INT_",
            DataKind::Complex => "CPX_",
            DataKind::Constant => "cons",
        }
    }

    /// Name of this kind's scalar type in the target representation.
    pub fn type_name(self, target: Target) -> &'static str {
        match (target, self) {
            (_, DataKind::Structure | DataKind::Complex) => "object",
            (_, DataKind::Boolean) => "boolean",
            (Target::JsonSchema, DataKind::String) => "string",
            (Target::JsonSchema, DataKind::Float | DataKind::Constant) => "number",
            (Target::SearchMapping, DataKind::String) => "keyword",
            (Target::SearchMapping, DataKind::Float) => "double",
            (Target::SearchMapping, DataKind::Constant) => "integer",
        }
    }

    pub fn is_object(self) -> bool {
        matches!(self, DataKind::Structure | DataKind::Complex)
    }
}

/// A parsed data type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataType {
    pub kind: DataKind,
    pub is_array: bool,
}

impl DataType {
    /// Parse a data type code. `path` is only used for the error.
    pub fn parse(code: &str, path: &str) -> Result<Self, ConvertError> {
        let kind = code
            .get(..4)
            .and_then(DataKind::from_prefix)
            .ok_or_else(|| ConvertError::UnknownType {
                path: path.to_string(),
                data_type: code.to_string(),
            })?;
        let is_array = DIMENSION_MARKER.is_match(code) || code.ends_with("ARRAY");
        Ok(Self { kind, is_array })
    }
}
