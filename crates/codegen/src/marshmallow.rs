//! Marshmallow schema classes (`StrictKeysMixin` subclasses with `fields.*`).

use anyhow::Result;
use rust_embed::Embed;

use crate::{load_templates, render_module, ClassDialect, ModuleContext};

#[derive(Embed)]
#[folder = "templates/marshmallow/"]
struct MarshmallowTemplates;

/// Validator-style schema classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marshmallow;

impl ClassDialect for Marshmallow {
    fn scalar(&self, json_type: &str) -> Option<&'static str> {
        match json_type {
            "number" => Some("fields.Number()"),
            "string" => Some("SanitizedUnicode()"),
            "boolean" => Some("fields.Boolean()"),
            _ => None,
        }
    }

    fn list_of(&self, element: &str) -> String {
        format!("fields.List({element})")
    }

    fn nested(&self, class_name: &str) -> String {
        format!("fields.Nested({class_name})")
    }

    fn imported_names(&self) -> &'static [&'static str] {
        &["SanitizedUnicode", "StrictKeysMixin", "fields"]
    }

    fn render(&self, module: &ModuleContext) -> Result<String> {
        let tera = load_templates(MarshmallowTemplates::iter().map(|name| {
            let data = MarshmallowTemplates::get(&name).map(|file| file.data);
            (name, data)
        }))?;
        render_module(&tera, "module.py.tera", module)
    }
}
