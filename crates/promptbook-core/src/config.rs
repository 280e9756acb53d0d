//! Configuration management for Promptbook.
//!
//! This module defines the `Config` struct and related functionality for
//! persisting cooking defaults. The configuration can be loaded from a YAML
//! file or created programmatically. The API credential is deliberately not
//! part of it; keys live in the environment only.
//!
//! # Examples
//!
//! ```no_run
//! use promptbook_core::config::Config;
//!
//! let mut config = Config::new();
//! config.model = "gpt-3.5-turbo".to_string();
//! config.temperature = 0.7;
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Cooking defaults for the Promptbook CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory containing recipe manifests
    #[serde(default)]
    pub recipe_dir: Option<String>,

    /// Model requested from the completion API
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature passed to the completion API
    #[serde(default)]
    pub temperature: f32,

    /// Base URL of the completion API (Optional)
    #[serde(default)]
    pub base_url: Option<Url>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self {
            recipe_dir: None,
            model: default_model(),
            temperature: 0.0,
            base_url: None,
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.yaml");

        let config = Config::new();
        config.save(&file_path).await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.model, default_model());
        assert_eq!(loaded.temperature, 0.0);
        assert_eq!(loaded.recipe_dir, None);
        assert_eq!(loaded.base_url, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_config_partial_file_fills_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.yaml");
        tokio::fs::write(&file_path, "temperature: 0.7\n").await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.model, "gpt-4");
        assert_eq!(loaded.temperature, 0.7);

        Ok(())
    }
}
