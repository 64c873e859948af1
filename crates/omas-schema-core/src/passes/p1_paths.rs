//! Pass 1: Path Normalization
//!
//! Splits a dotted dialect path into tree-insertion components. A segment
//! carrying the array marker (`wavevector[:]`) becomes two components: the
//! field itself, then [`PathComponent::Items`] for its element schema.

use std::fmt;

use crate::error::ConvertError;

/// Suffix marking a repeated structure in a dotted path.
pub const ARRAY_MARKER: &str = "[:]";

/// One step of a tree-insertion path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    /// A named child.
    Field(String),
    /// The element schema of the preceding array field.
    Items,
}

impl PathComponent {
    pub fn field(name: impl Into<String>) -> Self {
        PathComponent::Field(name.into())
    }

    /// The key used when this component is looked up by name.
    pub fn as_key(&self) -> &str {
        match self {
            PathComponent::Field(name) => name,
            PathComponent::Items => "items",
        }
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Normalize a dotted path into insertion components.
///
/// # Example
/// ```
/// use omas_schema_core::{normalize_path, PathComponent};
/// let components = normalize_path("gyrokinetics.wavevector[:].poloidal_turns").unwrap();
/// assert_eq!(
///     components,
///     vec![
///         PathComponent::field("gyrokinetics"),
///         PathComponent::field("wavevector"),
///         PathComponent::Items,
///         PathComponent::field("poloidal_turns"),
///     ]
/// );
/// ```
pub fn normalize_path(dotted: &str) -> Result<Vec<PathComponent>, ConvertError> {
    let mut components = Vec::new();
    for segment in dotted.split('.') {
        let (name, is_array) = match segment.strip_suffix(ARRAY_MARKER) {
            Some(name) => (name, true),
            None => (segment, false),
        };
        if name.is_empty() {
            return Err(ConvertError::malformed_path(dotted, "empty path segment"));
        }
        if name.contains('[') || name.contains(']') {
            return Err(ConvertError::malformed_path(
                dotted,
                format!("malformed array marker in segment '{segment}'"),
            ));
        }
        components.push(PathComponent::Field(name.to_string()));
        if is_array {
            components.push(PathComponent::Items);
        }
    }
    Ok(components)
}

/// Render components back into the dialect's dotted form.
pub fn to_dotted(components: &[PathComponent]) -> String {
    let mut out = String::new();
    for component in components {
        match component {
            PathComponent::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathComponent::Items => out.push_str(ARRAY_MARKER),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn keys(path: &str) -> Vec<String> {
        normalize_path(path)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_plain_path() {
        assert_eq!(keys("a.b.c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_array_marker_becomes_items() {
        assert_eq!(keys("a.b[:].c"), vec!["a", "b", "items", "c"]);
        assert_eq!(
            keys("gyrokinetics.wavevector[:].eigenmode[:].frequency_norm"),
            vec![
                "gyrokinetics",
                "wavevector",
                "items",
                "eigenmode",
                "items",
                "frequency_norm"
            ]
        );
    }

    #[test]
    fn test_trailing_array_marker() {
        assert_eq!(keys("a.b[:]"), vec!["a", "b", "items"]);
    }

    #[test]
    fn test_empty_segment_is_malformed() {
        for bad in ["", "a..b", ".a", "a.", "a.[:].b"] {
            let err = normalize_path(bad).unwrap_err();
            assert_eq!(err.error_code(), ErrorCode::MalformedPath, "input {bad:?}");
        }
    }

    #[test]
    fn test_bad_marker_is_malformed() {
        for bad in ["a.b[0].c", "a.b[:][:]", "a.b[.c"] {
            let err = normalize_path(bad).unwrap_err();
            assert_eq!(err.path(), bad);
        }
    }

    #[test]
    fn test_to_dotted_inverts_normalize() {
        let path = "gyrokinetics.species[:].charge_norm";
        assert_eq!(to_dotted(&normalize_path(path).unwrap()), path);
    }
}
