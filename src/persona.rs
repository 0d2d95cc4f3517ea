use serde::{Serialize, Deserialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::menu::Catalog;

/// Voice of the AI fallback, loaded from a JSON profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantPersona {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Value,  // description, focus, style, traits
}

impl AssistantPersona {
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
            .and_then(|v| v.as_str())
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.attributes.get(key)
            .and_then(|v| v.as_array())
    }

    /// System prompt for the completion provider. With a catalog, the menu is
    /// listed so the model only suggests dishes the restaurant serves.
    pub fn generate_system_prompt(&self, catalog: Option<&Catalog>) -> String {
        let description = self.get_str("description")
            .unwrap_or("a helpful restaurant assistant");

        let focus = self.get_str("focus")
            .map(|f| format!(" {}", f))
            .unwrap_or_default();

        let style = self.get_str("style")
            .map(|s| format!("\nYour communication style is {}.", s))
            .unwrap_or_default();

        let traits = self.get_array("traits")
            .map(|t| {
                let traits: Vec<String> = t.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect();
                if !traits.is_empty() {
                    format!("\nYour key traits are: {}", traits.join(", "))
                } else {
                    String::new()
                }
            })
            .unwrap_or_default();

        let menu = match catalog {
            Some(catalog) if !catalog.is_empty() => {
                let lines: Vec<String> = catalog.items().iter()
                    .map(|item| {
                        let tags: Vec<&str> = item.categories.iter().map(|c| c.as_str()).collect();
                        format!("- {} (${:.2}, {} calories): {}", item.name, item.price, item.calories, tags.join(", "))
                    })
                    .collect();
                format!("\nOnly recommend dishes from this menu:\n{}", lines.join("\n"))
            }
            _ => String::new(),
        };

        format!("You are {}, {}.{}{}{}{}", self.name, description, focus, style, traits, menu)
    }
}

impl Default for AssistantPersona {
    fn default() -> Self {
        Self {
            name: "DineLink Assistant".to_string(),
            attributes: serde_json::json!({
                "description": "a helpful restaurant assistant",
                "focus": "Suggest meals based on taste, calories, or categories like spicy or healthy."
            }),
        }
    }
}
