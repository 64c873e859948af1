//! Class collection: flatten a JSON Schema tree into named class definitions.
//!
//! Every object node (including a synthetic root wrapping the top-level
//! properties) becomes one class. A class is reserved *before* its children
//! are visited, so the accumulation order is parents first; emission walks it
//! in reverse so every class is defined before any class that references it.

use indexmap::IndexMap;
use omas_schema_core::ConvertError;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::ClassDialect;

/// Python names an UpperCamelCase class name can collide with.
const PYTHON_CONSTANTS: &[&str] = &["False", "None", "True"];

/// One attribute of a generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    /// Type expression in the output dialect, e.g. `fields.List(fields.Number())`.
    pub expr: String,
}

/// A generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Lower-case registry key (`flux_surface`, or `wavevector_eigenmode` after a collision).
    pub key: String,
    /// Emitted class name (`FluxSurface`).
    pub name: String,
    pub description: Option<String>,
    /// Attributes in property visit order.
    pub attributes: Vec<Attribute>,
}

/// Classes keyed by registry key, in accumulation order.
#[derive(Debug, Clone, Default)]
pub struct ClassSet {
    classes: IndexMap<String, ClassDef>,
}

impl ClassSet {
    pub fn get(&self, key: &str) -> Option<&ClassDef> {
        self.classes.get(key)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in the order they were discovered (parents first).
    pub fn accumulation_order(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    /// Classes in definition order: referenced classes before referrers.
    pub fn emission_order(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values().rev()
    }
}

/// Walk `properties` (a top-level JSON Schema properties mapping) as if it
/// were the body of one object named `root`, collecting a class per object.
pub fn collect_classes<D: ClassDialect + ?Sized>(
    properties: &Value,
    root: &str,
    dialect: &D,
) -> Result<ClassSet, ConvertError> {
    if !properties.is_object() {
        return Err(ConvertError::Consistency {
            path: root.to_string(),
            message: "top-level schema is not a properties mapping".to_string(),
        });
    }
    let root_node = json!({ "type": "object", "properties": properties });

    let mut collector = Collector {
        dialect,
        classes: ClassSet::default(),
    };
    if let Value::Object(node) = &root_node {
        collector.register_object(root, None, node, root)?;
    }

    tracing::debug!(classes = collector.classes.len(), "collected classes");
    Ok(collector.classes)
}

struct Collector<'a, D: ?Sized> {
    dialect: &'a D,
    classes: ClassSet,
}

impl<D: ClassDialect + ?Sized> Collector<'_, D> {
    /// Register an object node and its nested classes; returns the class name.
    fn register_object(
        &mut self,
        key: &str,
        parent: Option<&str>,
        node: &Map<String, Value>,
        path: &str,
    ) -> Result<String, ConvertError> {
        let class_key = self.reserve(key, parent);
        let name = self.dialect.class_name(&class_key);
        self.classes.classes.insert(
            class_key.clone(),
            ClassDef {
                key: class_key.clone(),
                name: name.clone(),
                description: node
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                attributes: Vec::new(),
            },
        );

        let empty = Map::new();
        let properties = match node.get("properties") {
            Some(Value::Object(properties)) => properties,
            Some(_) => return Err(consistency(path, "'properties' is not a mapping")),
            None => &empty,
        };

        let mut attributes = Vec::with_capacity(properties.len());
        for (prop, child) in properties {
            let child_path = format!("{path}.{prop}");
            let expr = self.expression(prop, &class_key, child, &child_path)?;
            attributes.push(Attribute {
                name: prop.clone(),
                expr,
            });
        }

        if let Some(class) = self.classes.classes.get_mut(&class_key) {
            class.attributes = attributes;
        }
        Ok(name)
    }

    /// Type expression for the property `key` of class `parent_key`.
    fn expression(
        &mut self,
        key: &str,
        parent_key: &str,
        node: &Value,
        path: &str,
    ) -> Result<String, ConvertError> {
        let obj = node
            .as_object()
            .ok_or_else(|| consistency(path, "schema node is not a mapping"))?;
        let kind = obj
            .get("type")
            .ok_or_else(|| consistency(path, "schema node has no 'type'"))?
            .as_str()
            .ok_or_else(|| consistency(path, "'type' is not a string"))?;

        match kind {
            "object" => {
                let name = self.register_object(key, Some(parent_key), obj, path)?;
                Ok(self.dialect.nested(&name))
            }
            "array" => {
                let items = obj
                    .get("items")
                    .ok_or_else(|| consistency(path, "array node has no 'items'"))?;
                let element = self.expression(key, parent_key, items, &format!("{path}[:]"))?;
                Ok(self.dialect.list_of(&element))
            }
            other => self
                .dialect
                .scalar(other)
                .map(str::to_string)
                .ok_or_else(|| consistency(path, format!("unsupported type '{other}'"))),
        }
    }

    /// Pick a free registry key: the property name, else parent-qualified,
    /// else with a numeric suffix.
    fn reserve(&self, key: &str, parent: Option<&str>) -> String {
        if !self.is_taken(key) {
            return key.to_string();
        }
        let base = match parent {
            Some(parent) => format!("{parent}_{key}"),
            None => key.to_string(),
        };
        if !self.is_taken(&base) {
            tracing::debug!(key, qualified = %base, "class name collision");
            return base;
        }
        let mut n = 2;
        while self.is_taken(&format!("{base}_{n}")) {
            n += 1;
        }
        format!("{base}_{n}")
    }

    /// A key is taken when it, or the class name it maps to, is already in
    /// use by a class, a module import or a Python constant.
    fn is_taken(&self, candidate: &str) -> bool {
        if self.classes.classes.contains_key(candidate) {
            return true;
        }
        let name = self.dialect.class_name(candidate);
        PYTHON_CONSTANTS.contains(&name.as_str())
            || self.dialect.imported_names().contains(&name.as_str())
            || self.classes.classes.values().any(|class| class.name == name)
    }
}

fn consistency(path: &str, message: impl Into<String>) -> ConvertError {
    ConvertError::Consistency {
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataclasses::Dataclasses;
    use crate::marshmallow::Marshmallow;
    use omas_schema_core::ErrorCode;
    use pretty_assertions::assert_eq;

    fn keys(set: &ClassSet) -> Vec<&str> {
        set.emission_order().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_nested_object_is_defined_first() {
        let schema = json!({
            "a": {
                "type": "object",
                "properties": {
                    "b": {"type": "object", "properties": {"x": {"type": "number"}}}
                }
            }
        });

        let set = collect_classes(&schema, "root", &Dataclasses).unwrap();

        assert_eq!(keys(&set), vec!["b", "a", "root"]);
        let accumulated: Vec<&str> = set.accumulation_order().map(|c| c.key.as_str()).collect();
        assert_eq!(accumulated, vec!["root", "a", "b"]);
        assert_eq!(
            set.get("a").unwrap().attributes,
            vec![Attribute {
                name: "b".to_string(),
                expr: "B".to_string()
            }]
        );
    }

    #[test]
    fn test_array_of_objects_registers_element_class() {
        let schema = json!({
            "wavevector": {
                "type": "array",
                "description": "Set of wavevectors",
                "items": {
                    "type": "object",
                    "properties": {
                        "binormal_component_norm": {"type": "number"},
                        "poloidal_turns": {"type": "number"}
                    }
                }
            }
        });

        let set = collect_classes(&schema, "gyrokinetics", &Marshmallow).unwrap();

        assert_eq!(
            set.get("gyrokinetics").unwrap().attributes[0].expr,
            "fields.List(fields.Nested(Wavevector))"
        );
        assert_eq!(set.get("wavevector").unwrap().name, "Wavevector");
        assert_eq!(keys(&set), vec!["wavevector", "gyrokinetics"]);
    }

    #[test]
    fn test_scalar_expressions() {
        let schema = json!({
            "code": {
                "type": "object",
                "description": "Code info",
                "properties": {
                    "name": {"type": "string"},
                    "non_linear_run": {"type": "boolean"},
                    "q": {"type": "number"},
                    "time": {"type": "array", "items": {"type": "number"}}
                }
            }
        });

        let set = collect_classes(&schema, "gyrokinetics", &Dataclasses).unwrap();
        let code = set.get("code").unwrap();
        let exprs: Vec<(&str, &str)> = code
            .attributes
            .iter()
            .map(|a| (a.name.as_str(), a.expr.as_str()))
            .collect();
        assert_eq!(
            exprs,
            vec![
                ("name", "str"),
                ("non_linear_run", "bool"),
                ("q", "float"),
                ("time", "List[float]"),
            ]
        );
        assert_eq!(code.description.as_deref(), Some("Code info"));
    }

    #[test]
    fn test_colliding_names_are_qualified() {
        let eigenmode = json!({
            "type": "array",
            "items": {"type": "object", "properties": {"frequency_norm": {"type": "number"}}}
        });
        let schema = json!({
            "linear": {"type": "object", "properties": {"eigenmode": eigenmode.clone()}},
            "wavevector": {"type": "object", "properties": {"eigenmode": eigenmode}}
        });

        let set = collect_classes(&schema, "gyrokinetics", &Dataclasses).unwrap();

        assert!(set.get("eigenmode").is_some());
        assert!(set.get("wavevector_eigenmode").is_some());
        assert_eq!(
            set.get("wavevector").unwrap().attributes[0].expr,
            "List[WavevectorEigenmode]"
        );
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_missing_type_is_consistency_error() {
        let schema = json!({
            "model": {"type": "object", "properties": {"broken": {"description": "no type"}}}
        });

        let err = collect_classes(&schema, "gyrokinetics", &Marshmallow).unwrap_err();

        assert_eq!(err.error_code(), ErrorCode::ConsistencyError);
        assert_eq!(err.path(), "gyrokinetics.model.broken");
    }

    #[test]
    fn test_array_without_items_is_consistency_error() {
        let schema = json!({ "time": {"type": "array"} });
        let err = collect_classes(&schema, "gyrokinetics", &Dataclasses).unwrap_err();
        assert!(err.to_string().contains("no 'items'"));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = collect_classes(&json!([1]), "gyrokinetics", &Dataclasses).unwrap_err();
        assert_eq!(err.path(), "gyrokinetics");
    }

    #[test]
    fn test_empty_properties_yield_root_only() {
        let set = collect_classes(&json!({}), "gyrokinetics", &Dataclasses).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("gyrokinetics").unwrap().attributes.is_empty());
    }

    #[test]
    fn test_class_names_avoid_imported_names() {
        let schema = json!({
            "list": {"type": "object", "properties": {"tags": {"type": "array", "items": {"type": "string"}}}},
            "none": {"type": "object", "properties": {}}
        });

        let set = collect_classes(&schema, "gyrokinetics", &Dataclasses).unwrap();

        let names: Vec<&str> = set.accumulation_order().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Gyrokinetics", "GyrokineticsList", "GyrokineticsNone"]);
        assert_eq!(set.get("gyrokinetics_list").unwrap().attributes[0].expr, "List[str]");
    }

    #[test]
    fn test_marshmallow_imports_are_reserved() {
        let schema = json!({
            "strict_keys_mixin": {"type": "object", "properties": {}},
            "sanitized_unicode": {"type": "object", "properties": {}}
        });

        let set = collect_classes(&schema, "gyrokinetics", &Marshmallow).unwrap();

        assert!(set.get("gyrokinetics_strict_keys_mixin").is_some());
        assert!(set.get("gyrokinetics_sanitized_unicode").is_some());
        assert!(set
            .accumulation_order()
            .all(|c| c.name != "StrictKeysMixin" && c.name != "SanitizedUnicode"));
    }

    #[test]
    fn test_keys_with_equal_class_names_are_disambiguated() {
        let schema = json!({
            "a": {"type": "object", "properties": {"flux_surface": {"type": "object", "properties": {}}}},
            "b": {"type": "object", "properties": {"fluxSurface": {"type": "object", "properties": {}}}}
        });

        let set = collect_classes(&schema, "gyrokinetics", &Dataclasses).unwrap();

        assert_eq!(set.get("flux_surface").unwrap().name, "FluxSurface");
        assert_eq!(set.get("b_fluxSurface").unwrap().name, "BFluxSurface");
    }

    #[test]
    fn test_root_named_like_an_import_gets_suffix() {
        let set = collect_classes(&json!({}), "list", &Dataclasses).unwrap();
        assert_eq!(set.get("list_2").unwrap().name, "List2");
    }
}
