//! Render configuration.

use crate::errors::{AssertError, AssertResult};
use serde::{Deserialize, Serialize};

/// Controls how expectations, mismatches and lineage diagrams are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Name the subject is given in rendered expressions.
    #[serde(default = "default_subject_name")]
    pub subject_name: String,
    /// Spaces added per nesting level.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Written in place of a value whose formatting panicked.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Draw the lineage diagram under a failing leaf whose transform is a chain.
    #[serde(default = "default_inline_lineage")]
    pub inline_lineage: bool,
    /// Name given to the output of a split chain's base, as in `(y=x.f()).g()`.
    #[serde(default = "default_intermediate_name")]
    pub intermediate_name: String,
}

fn default_subject_name() -> String {
    "x".to_string()
}

fn default_indent() -> usize {
    2
}

fn default_placeholder() -> String {
    "<unrenderable>".to_string()
}

fn default_inline_lineage() -> bool {
    true
}

fn default_intermediate_name() -> String {
    "y".to_string()
}

impl RenderConfig {
    /// Parse from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> AssertResult<Self> {
        toml::from_str(content).map_err(|e| AssertError::Config {
            message: e.to_string(),
        })
    }

    /// Same as the default, but without inline diagrams.
    pub fn compact() -> Self {
        Self {
            inline_lineage: false,
            ..Self::default()
        }
    }

    pub(crate) fn indent_str(&self) -> String {
        " ".repeat(self.indent)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            subject_name: default_subject_name(),
            indent: default_indent(),
            placeholder: default_placeholder(),
            inline_lineage: default_inline_lineage(),
            intermediate_name: default_intermediate_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = RenderConfig::from_toml_str("").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RenderConfig::from_toml_str(
            r#"
subject_name = "subject"
inline_lineage = false
"#,
        )
        .unwrap();
        assert_eq!(config.subject_name, "subject");
        assert!(!config.inline_lineage);
        assert_eq!(config.indent, 2);
        assert_eq!(config.placeholder, "<unrenderable>");
        assert_eq!(config.intermediate_name, "y");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = RenderConfig::from_toml_str("indent = \"wide\"").unwrap_err();
        assert!(matches!(err, AssertError::Config { .. }));
    }
}
