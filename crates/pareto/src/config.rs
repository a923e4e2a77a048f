//! Configuration types for the directive engine.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file, and every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining registry and extraction settings.
//! - [`RegistryConfig`] - Where the vocabulary comes from.
//! - [`ExtractConfig`] - Limits for batch extraction.
//!
//! # Example
//!
//! ```
//! # use pareto::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [registry]
//!     include_builtin = false
//!
//!     [extract]
//!     max_directives = 4
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(!config.registry().include_builtin());
//! assert_eq!(config.extract().max_directives(), Some(4));
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Registry configuration section.
    #[serde(default)]
    registry: RegistryConfig,

    /// Extraction configuration section.
    #[serde(default)]
    extract: ExtractConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(registry: RegistryConfig, extract: ExtractConfig) -> Self {
        Self { registry, extract }
    }

    /// Returns the registry configuration.
    pub fn registry(&self) -> &RegistryConfig {
        &self.registry
    }

    /// Returns the extraction configuration.
    pub fn extract(&self) -> &ExtractConfig {
        &self.extract
    }

    /// Replace the registry definition file path.
    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry.path = Some(path.into());
        self
    }
}

/// Vocabulary source configuration.
///
/// By default the built-in vocabulary is used as is. A definition file
/// extends it, or replaces it when `include_builtin` is `false`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Path of a TOML registry definition file.
    #[serde(default)]
    path: Option<PathBuf>,

    /// Whether the definition file extends the built-in vocabulary.
    #[serde(default = "default_include_builtin")]
    include_builtin: bool,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: None,
            include_builtin: default_include_builtin(),
        }
    }
}

impl RegistryConfig {
    /// Creates a new [`RegistryConfig`].
    ///
    /// # Arguments
    ///
    /// * `path` - Optional registry definition file.
    /// * `include_builtin` - Whether the file extends the built-in vocabulary.
    pub fn new(path: Option<PathBuf>, include_builtin: bool) -> Self {
        Self {
            path,
            include_builtin,
        }
    }

    /// Returns the registry definition file path, if one is configured.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns whether the built-in vocabulary is the base.
    pub fn include_builtin(&self) -> bool {
        self.include_builtin
    }
}

/// Batch extraction settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Maximum number of directives returned; unlimited when unset.
    #[serde(default)]
    max_directives: Option<usize>,
}

impl ExtractConfig {
    pub fn new(max_directives: Option<usize>) -> Self {
        Self { max_directives }
    }

    /// Returns the extraction cap, or `None` for unlimited.
    pub fn max_directives(&self) -> Option<usize> {
        self.max_directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.registry().path().is_none());
        assert!(config.registry().include_builtin());
        assert_eq!(config.extract().max_directives(), None);
    }

    #[test]
    fn test_empty_sections_keep_defaults() {
        let config: AppConfig = toml::from_str("[registry]\n[extract]\n").unwrap();
        assert!(config.registry().include_builtin());
        assert_eq!(config.extract().max_directives(), None);
    }

    #[test]
    fn test_registry_path() {
        let config: AppConfig =
            toml::from_str("[registry]\npath = \"vocab/extra.toml\"\n").unwrap();
        assert_eq!(
            config.registry().path(),
            Some(Path::new("vocab/extra.toml"))
        );
        assert!(config.registry().include_builtin());
    }

    #[test]
    fn test_with_registry_path_overrides() {
        let config = AppConfig::default().with_registry_path("other.toml");
        assert_eq!(config.registry().path(), Some(Path::new("other.toml")));
    }
}
