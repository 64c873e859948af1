pub mod classes;
pub mod dataclasses;
pub mod marshmallow;

use anyhow::{Context, Result};
use heck::ToUpperCamelCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tera::Tera;

pub use classes::{collect_classes, Attribute, ClassDef, ClassSet};

/// Python class flavour to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Marshmallow,
    Dataclasses,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Marshmallow => write!(f, "marshmallow"),
            Dialect::Dataclasses => write!(f, "dataclasses"),
        }
    }
}

/// Naming strategy of one output dialect.
///
/// The class collector is dialect-agnostic; everything that differs between
/// marshmallow schemas and dataclasses lives behind this trait.
pub trait ClassDialect {
    /// Expression for a scalar JSON Schema type, `None` if unsupported.
    fn scalar(&self, json_type: &str) -> Option<&'static str>;

    /// Expression for a list whose elements have type `element`.
    fn list_of(&self, element: &str) -> String;

    /// Expression referencing the generated class `class_name`.
    fn nested(&self, class_name: &str) -> String;

    /// Names the rendered module imports; generated classes must not shadow them.
    fn imported_names(&self) -> &'static [&'static str];

    /// Class name for a registry key.
    fn class_name(&self, key: &str) -> String {
        key.to_upper_camel_case()
    }

    /// Render the full module source for the collected classes.
    fn render(&self, module: &ModuleContext) -> Result<String>;
}

/// Template context for a generated module.
#[derive(Debug, Serialize)]
pub struct ModuleContext {
    pub root: String,
    /// Classes in emission order.
    pub classes: Vec<ClassContext>,
}

/// Template context for a single class.
#[derive(Debug, Serialize)]
pub struct ClassContext {
    pub name: String,
    pub docstring: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl ModuleContext {
    pub fn new(root: &str, classes: &ClassSet) -> Self {
        Self {
            root: root.to_string(),
            classes: classes
                .emission_order()
                .map(|class| ClassContext {
                    name: class.name.clone(),
                    docstring: class
                        .description
                        .as_deref()
                        .filter(|d| !d.trim().is_empty())
                        .map(python_docstring),
                    attributes: class.attributes.clone(),
                })
                .collect(),
        }
    }
}

/// Generate Python source for a converted JSON Schema properties mapping.
pub fn generate(properties: &Value, root: &str, dialect: Dialect) -> Result<String> {
    match dialect {
        Dialect::Marshmallow => generate_with(properties, root, &marshmallow::Marshmallow),
        Dialect::Dataclasses => generate_with(properties, root, &dataclasses::Dataclasses),
    }
}

/// Generate Python source with an arbitrary naming strategy.
pub fn generate_with<D: ClassDialect + ?Sized>(
    properties: &Value,
    root: &str,
    dialect: &D,
) -> Result<String> {
    let classes = collect_classes(properties, root, dialect)?;
    dialect.render(&ModuleContext::new(root, &classes))
}

/// Escape text for the body of a `"""` docstring.
pub fn python_docstring(text: &str) -> String {
    text.trim().replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build a Tera engine from an iterator of embedded `(name, bytes)` templates.
pub(crate) fn load_templates<I, S, B>(files: I) -> Result<Tera>
where
    I: IntoIterator<Item = (S, Option<B>)>,
    S: AsRef<str>,
    B: AsRef<[u8]>,
{
    let mut tera = Tera::default();
    for (file_name, data) in files {
        let file_name = file_name.as_ref();
        let data =
            data.with_context(|| format!("Failed to load embedded template: {}", file_name))?;
        let content = std::str::from_utf8(data.as_ref())
            .with_context(|| format!("Template {} is not valid UTF-8", file_name))?;
        tera.add_raw_template(file_name, content)
            .with_context(|| format!("Failed to register template: {}", file_name))?;
    }
    Ok(tera)
}

pub(crate) fn render_module(tera: &Tera, template: &str, module: &ModuleContext) -> Result<String> {
    let context = tera::Context::from_serialize(module)
        .with_context(|| format!("Failed to build context for {}", template))?;
    tera.render(template, &context)
        .with_context(|| format!("Failed to render template: {}", template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use omas_schema_core::ConvertError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "flux_surface": {
                "type": "object",
                "description": "Flux surface characteristics",
                "properties": {"q": {"type": "number", "description": "Safety factor"}}
            },
            "time": {"type": "array", "items": {"type": "number"}}
        })
    }

    #[test]
    fn test_docstring_escaping() {
        assert_eq!(python_docstring(r#"a "quoted" \ text"#), r#"a \"quoted\" \\ text"#);
        assert_eq!(python_docstring("ends with \"\"\""), r#"ends with \"\"\""#);
    }

    #[test]
    fn test_module_context_orders_children_first() {
        let classes = collect_classes(&sample(), "gyrokinetics", &dataclasses::Dataclasses).unwrap();
        let module = ModuleContext::new("gyrokinetics", &classes);
        let names: Vec<&str> = module.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["FluxSurface", "Gyrokinetics"]);
        assert_eq!(
            module.classes[0].docstring.as_deref(),
            Some("Flux surface characteristics")
        );
        assert_eq!(module.classes[1].docstring, None);
    }

    #[test]
    fn test_generate_dispatches_on_dialect() {
        let marsh = generate(&sample(), "gyrokinetics", Dialect::Marshmallow).unwrap();
        let data = generate(&sample(), "gyrokinetics", Dialect::Dataclasses).unwrap();
        assert!(marsh.contains("class FluxSurface(StrictKeysMixin):"));
        assert!(data.contains("@dataclass\nclass FluxSurface:"));
    }

    #[test]
    fn test_generate_surfaces_consistency_error() {
        let broken = json!({"model": {"type": "object", "properties": {"x": {}}}});
        let err = generate(&broken, "gyrokinetics", Dialect::Dataclasses).unwrap_err();
        let convert = err.downcast_ref::<ConvertError>().expect("typed error");
        assert_eq!(convert.path(), "gyrokinetics.model.x");
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::Marshmallow.to_string(), "marshmallow");
        assert_eq!(
            serde_json::to_value(Dialect::Dataclasses).unwrap(),
            json!("dataclasses")
        );
    }
}
