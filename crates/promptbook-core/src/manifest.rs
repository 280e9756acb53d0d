//! Recipe manifest file format.
//!
//! A recipe manifest is a declarative YAML or TOML file describing one
//! recipe: its metadata, typed parameter list, optional UI hints, and the
//! Tera template that produces the prompt text.
//!
//! ```yaml
//! name: haiku
//! title: Haiku writer
//! params:
//!   - name: topic
//!   - name: lines
//!     type: integer
//!     default: 3
//! ui:
//!   topic:
//!     help: What the poem should be about.
//! template: |
//!   Write a haiku about {{ topic }} in {{ lines }} lines.
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::recipe::{ParamSpec, Recipe, RecipeBody, RecipeMetadata, UiHintMap};

/// The root manifest structure for one recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeManifest {
    /// Recipe identifier, unique within a registry
    pub name: String,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Author credit
    #[serde(default)]
    pub author: Option<String>,

    /// What the recipe's prompt does
    #[serde(default)]
    pub description: Option<String>,

    /// Declared parameters, in form order
    #[serde(default)]
    pub params: Vec<ParamSpec>,

    /// Optional per-parameter UI hints
    #[serde(default)]
    pub ui: Option<UiHintMap>,

    /// Tera template producing the prompt text
    pub template: String,
}

impl RecipeManifest {
    /// Load a recipe manifest from a file (supports both YAML and TOML)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            crate::Error::config(format!(
                "Failed to parse recipe manifest at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse content as either YAML or TOML
    fn parse_content(content: &str) -> Result<Self, String> {
        // Try to parse as YAML first
        let yaml_err = match serde_yaml::from_str(content) {
            Ok(manifest) => return Ok(manifest),
            Err(e) => e,
        };

        // If YAML parsing fails, try TOML
        if let Ok(manifest) = toml::from_str(content) {
            return Ok(manifest);
        }

        Err(format!("content is neither valid YAML nor TOML: {}", yaml_err))
    }

    /// Convert into a validated [`Recipe`] with a template body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Introspection`] when the declared parameter
    /// list is malformed.
    pub fn into_recipe(self) -> crate::Result<Recipe> {
        let metadata = RecipeMetadata {
            title: self.title,
            author: self.author,
            description: self.description,
        };
        Recipe::new(
            self.name,
            metadata,
            self.params,
            self.ui,
            RecipeBody::Template(self.template),
        )
    }
}
