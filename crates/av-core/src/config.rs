//! Variant run configuration
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! base_root = "Assets"
//! folder_prefix = "Variant-"
//! default_tag = "sd"
//! ```

use crate::error::VariantError;
use av_asset::{VariantTag, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by every component of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    /// Directory every asset path must be rooted under
    pub base_root: String,
    /// Prefix of variant folder names (`Variant-` + tag)
    pub folder_prefix: String,
    /// Tag used when the caller does not name one
    pub default_tag: VariantTag,
}

impl VariantConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base directory
    #[inline]
    #[must_use]
    pub fn with_base_root(mut self, base_root: impl Into<String>) -> Self {
        self.base_root = base_root.into();
        self
    }

    /// With variant folder prefix
    #[inline]
    #[must_use]
    pub fn with_folder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.folder_prefix = prefix.into();
        self
    }

    /// With default tag
    #[inline]
    #[must_use]
    pub fn with_default_tag(mut self, tag: VariantTag) -> Self {
        self.default_tag = tag;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns error on malformed TOML or invalid values
    pub fn from_toml_str(source: &str) -> Result<Self, VariantError> {
        let config: Self =
            toml::from_str(source).map_err(|e| VariantError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is invalid
    pub fn load(path: &Path) -> Result<Self, VariantError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| VariantError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Check invariants
    ///
    /// # Errors
    /// Returns error if the base directory or prefix is unusable
    pub fn validate(&self) -> Result<(), VariantError> {
        if self.base_root.is_empty()
            || self.base_root.starts_with(SEPARATOR)
            || self.base_root.ends_with(SEPARATOR)
        {
            return Err(VariantError::Config(format!(
                "base_root '{}' must be a relative directory without surrounding separators",
                self.base_root
            )));
        }
        if self.folder_prefix.contains(SEPARATOR) {
            return Err(VariantError::Config(format!(
                "folder_prefix '{}' must not contain a separator",
                self.folder_prefix
            )));
        }
        Ok(())
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            base_root: "Assets".to_string(),
            folder_prefix: "Variant-".to_string(),
            default_tag: VariantTag::new("sd").unwrap_or_else(|_| unreachable!()),
        }
    }
}
