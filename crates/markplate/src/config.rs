//! Render configuration.
//!
//! Everything that shapes a render can be put in one YAML file:
//!
//! ```yaml
//! templates: ./templates      # directory or bundle file
//! html:
//!   smartypants: true
//!   smartypants_latex_dashes: false
//!   complete_page: true
//!   css: style.css
//! extensions:
//!   footnotes: true
//! ```
//!
//! Every field is optional. Relative template paths resolve against the
//! directory of the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::html::HtmlOptions;
use crate::parse::Extensions;

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Complete render configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Template directory or YAML bundle.
    pub templates: Option<PathBuf>,
    pub html: HtmlOptions,
    pub extensions: Extensions,
}

impl RenderConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(base) = path.parent() {
            config.templates = config
                .templates
                .map(|t| if t.is_relative() { base.join(t) } else { t });
        }
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(RenderConfig::from_yaml("").unwrap(), RenderConfig::default());
        assert_eq!(
            RenderConfig::from_yaml("  \n").unwrap(),
            RenderConfig::default()
        );
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = RenderConfig::from_yaml(
            "html:\n  complete_page: true\nextensions:\n  footnotes: true\n",
        )
        .unwrap();
        assert!(config.html.complete_page);
        assert!(config.html.smartypants);
        assert!(config.extensions.footnotes);
        assert!(config.extensions.tables);
        assert_eq!(config.templates, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RenderConfig::from_yaml("templtes: x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file_resolves_relative_templates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("markplate.yaml");
        std::fs::write(&path, "templates: theme\n").unwrap();

        let config = RenderConfig::from_file(&path).unwrap();
        assert_eq!(config.templates, Some(dir.path().join("theme")));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = RenderConfig::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.yaml"));
    }
}
