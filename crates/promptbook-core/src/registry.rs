//! Recipe registry: loading, discovery, and built-in recipes.
//!
//! The registry keeps loaded recipes in registration order; file-loaded
//! recipes are added in lexicographic filename order so listings are
//! deterministic.
//!
//! # Recipe Discovery
//!
//! With no explicit directory, recipes are searched in:
//! 1. Directory specified by the `PROMPTBOOK_RECIPE_DIR` environment variable
//! 2. `recipes/` in the current working directory
//! 3. `~/.promptbook/recipes/` in the user's home directory

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tokio::fs;

use crate::manifest::RecipeManifest;
use crate::recipe::{ParamSpec, ParamType, ParamValue, Recipe, RecipeBody, RecipeMetadata};
use crate::resolve::ResolvedArgs;

/// Ordered collection of loaded recipes.
#[derive(Debug, Default)]
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
}

impl RecipeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in recipes
    pub fn with_builtins() -> Self {
        Self {
            recipes: builtin_recipes(),
        }
    }

    /// Register a recipe.
    ///
    /// Names must be unique; registering a duplicate is a configuration
    /// error so file load order can never silently shadow a recipe.
    pub fn register(&mut self, recipe: Recipe) -> crate::Result<()> {
        if self.get(recipe.name()).is_some() {
            return Err(crate::Error::config(format!(
                "Recipe '{}' is already registered",
                recipe.name()
            )));
        }
        self.recipes.push(recipe);
        Ok(())
    }

    /// Look up a recipe by name
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name() == name)
    }

    /// Recipe names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.name()).collect()
    }

    /// Iterate recipes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Number of registered recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Load every recipe manifest (`*.yaml`, `*.yml`, `*.toml`) in a
    /// directory, in lexicographic filename order.
    ///
    /// Returns the number of recipes loaded.
    pub async fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> crate::Result<usize> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir).await?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str());
            if matches!(ext, Some("yaml") | Some("yml") | Some("toml")) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            log::debug!("Loading recipe manifest: {}", path.display());
            let manifest = RecipeManifest::from_file(&path).await?;
            self.register(manifest.into_recipe()?)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Build a registry from the built-in recipes plus whatever recipe
    /// directory can be resolved.
    ///
    /// An explicit `custom_dir` must exist. Without one, the standard
    /// locations are searched; if none exists the registry holds only the
    /// built-in recipes.
    pub async fn discover(custom_dir: Option<&Path>) -> crate::Result<Self> {
        let mut registry = Self::with_builtins();

        let dir = match custom_dir {
            Some(dir) => {
                if !dir.exists() {
                    return Err(crate::Error::config(format!(
                        "Recipe directory not found: {}",
                        dir.display()
                    )));
                }
                Some(dir.to_path_buf())
            }
            None => find_recipe_dir(),
        };

        match dir {
            Some(dir) => {
                let loaded = registry.load_dir(&dir).await?;
                log::debug!("Loaded {} recipe(s) from {}", loaded, dir.display());
            }
            None => {
                log::debug!("No recipe directory found; using built-in recipes only");
            }
        }

        Ok(registry)
    }
}

/// Find the recipe directory by checking standard locations.
fn find_recipe_dir() -> Option<PathBuf> {
    // 1. Check environment variable
    if let Ok(dir) = std::env::var("PROMPTBOOK_RECIPE_DIR") {
        let path = PathBuf::from(dir);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Check current directory
    let local = PathBuf::from("recipes");
    if local.exists() {
        return Some(local);
    }

    // 3. Check in the user's home directory
    if let Some(home_dir) = dirs::home_dir() {
        let dir = home_dir.join(".promptbook").join("recipes");
        if dir.exists() {
            return Some(dir);
        }
    }

    None
}

static BUILTINS: Lazy<Vec<Recipe>> = Lazy::new(|| {
    vec![
        Recipe::new(
            "greet",
            RecipeMetadata {
                title: Some("Greeting writer".to_string()),
                author: None,
                description: Some("Drafts a short greeting for a named recipient.".to_string()),
            },
            vec![
                ParamSpec::new("name", ParamType::Text),
                ParamSpec::new("times", ParamType::Integer)
                    .with_default(ParamValue::Integer(1)),
            ],
            None,
            RecipeBody::Function(greet_body),
        )
        .expect("built-in recipe 'greet' is well formed"),
        Recipe::new(
            "brainstorm",
            RecipeMetadata {
                title: Some("Idea generator".to_string()),
                author: None,
                description: Some("Asks for a list of distinct ideas on a topic.".to_string()),
            },
            vec![
                ParamSpec::new("topic", ParamType::Text),
                ParamSpec::new("ideas", ParamType::Integer)
                    .with_default(ParamValue::Integer(5)),
            ],
            None,
            RecipeBody::Function(brainstorm_body),
        )
        .expect("built-in recipe 'brainstorm' is well formed"),
    ]
});

/// Built-in demonstration recipes compiled into the crate
pub fn builtin_recipes() -> Vec<Recipe> {
    BUILTINS.clone()
}

fn greet_body(args: &ResolvedArgs) -> crate::Result<String> {
    let name = args.get("name").and_then(|v| v.as_text()).unwrap_or("");
    let times = args.get("times").and_then(|v| v.as_integer()).unwrap_or(1);
    Ok(format!(
        "Write {} short, warm greeting(s) addressed to {}.",
        times, name
    ))
}

fn brainstorm_body(args: &ResolvedArgs) -> crate::Result<String> {
    let topic = args.get("topic").and_then(|v| v.as_text()).unwrap_or("");
    let ideas = args.get("ideas").and_then(|v| v.as_integer()).unwrap_or(5);
    Ok(format!(
        "List {} distinct, concrete ideas about the following topic.\n\
         Keep each idea to one sentence.\n\n\
         Topic: {}",
        ideas, topic
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"
name: haiku
params:
  - name: topic
template: |
  Write a haiku about {{ topic }}.
"#;

    #[test]
    fn test_builtins_are_registered() {
        let registry = RecipeRegistry::with_builtins();
        assert!(registry.get("greet").is_some());
        assert!(registry.get("brainstorm").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = RecipeRegistry::with_builtins();
        let duplicate = builtin_recipes().into_iter().next().unwrap();
        assert!(matches!(
            registry.register(duplicate),
            Err(crate::Error::Config(_))
        ));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_load_dir_registers_manifests_in_order() -> crate::Result<()> {
        let dir = tempdir()?;
        tokio::fs::write(dir.path().join("b_second.yaml"), MANIFEST.replace("haiku", "second"))
            .await?;
        tokio::fs::write(dir.path().join("a_first.yaml"), MANIFEST.replace("haiku", "first"))
            .await?;
        tokio::fs::write(dir.path().join("notes.txt"), "ignored").await?;

        let mut registry = RecipeRegistry::new();
        let loaded = registry.load_dir(dir.path()).await?;
        assert_eq!(loaded, 2);
        assert_eq!(registry.names(), vec!["first", "second"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_discover_with_custom_dir() -> crate::Result<()> {
        let dir = tempdir()?;
        tokio::fs::write(dir.path().join("haiku.yaml"), MANIFEST).await?;

        let registry = RecipeRegistry::discover(Some(dir.path())).await?;
        assert!(registry.get("haiku").is_some());
        assert!(registry.get("greet").is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_discover_with_missing_custom_dir_fails() {
        let result = RecipeRegistry::discover(Some(Path::new("/nonexistent/recipes"))).await;
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
