//! Plain `@dataclass` record classes.

use anyhow::Result;
use rust_embed::Embed;

use crate::{load_templates, render_module, ClassDialect, ModuleContext};

#[derive(Embed)]
#[folder = "templates/dataclasses/"]
struct DataclassTemplates;

/// Record-style classes with `typing` annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dataclasses;

impl ClassDialect for Dataclasses {
    fn scalar(&self, json_type: &str) -> Option<&'static str> {
        match json_type {
            "number" => Some("float"),
            "string" => Some("str"),
            "boolean" => Some("bool"),
            _ => None,
        }
    }

    fn list_of(&self, element: &str) -> String {
        format!("List[{element}]")
    }

    fn nested(&self, class_name: &str) -> String {
        class_name.to_string()
    }

    fn imported_names(&self) -> &'static [&'static str] {
        &["List", "dataclass"]
    }

    fn render(&self, module: &ModuleContext) -> Result<String> {
        let tera = load_templates(DataclassTemplates::iter().map(|name| {
            let data = DataclassTemplates::get(&name).map(|file| file.data);
            (name, data)
        }))?;
        render_module(&tera, "module.py.tera", module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_with;
    use serde_json::json;

    #[test]
    fn test_naming_table() {
        assert_eq!(Dataclasses.scalar("number"), Some("float"));
        assert_eq!(Dataclasses.scalar("string"), Some("str"));
        assert_eq!(Dataclasses.scalar("boolean"), Some("bool"));
        assert_eq!(Dataclasses.scalar("keyword"), None);
        assert_eq!(Dataclasses.list_of(&Dataclasses.nested("Eigenmode")), "List[Eigenmode]");
        assert_eq!(Dataclasses.class_name("phi_potential_amplitude"), "PhiPotentialAmplitude");
    }

    #[test]
    fn test_rendered_module() {
        let schema = json!({
            "wavevector": {
                "type": "array",
                "items": {
                    "type": "object",
                    "description": "One \"wavevector\"",
                    "properties": {
                        "poloidal_turns": {"type": "number"},
                        "eigenmode": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {"frequency_norm": {"type": "number"}}
                            }
                        }
                    }
                }
            }
        });

        let source = generate_with(&schema, "gyrokinetics", &Dataclasses).unwrap();

        assert!(source.contains("from dataclasses import dataclass"));
        assert!(source.contains("from typing import List"));
        assert!(source.contains("@dataclass\nclass Eigenmode:\n    frequency_norm: float\n"));
        assert!(source.contains("    \"\"\"One \\\"wavevector\\\"\"\"\"\n"));
        assert!(source.contains("    eigenmode: List[Eigenmode]\n"));
        assert!(source.contains("    wavevector: List[Wavevector]\n"));

        let eigen = source.find("class Eigenmode:").unwrap();
        let wave = source.find("class Wavevector:").unwrap();
        let root = source.find("class Gyrokinetics:").unwrap();
        assert!(eigen < wave && wave < root);
    }
}
