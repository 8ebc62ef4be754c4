//! Inspector configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```
//! use tokenscope::InspectorConfig;
//!
//! let config = InspectorConfig::from_toml_str(r#"
//! token_prefix = "--acme-"
//! sheet_prefix = "acme"
//!
//! [timings]
//! debounce_ms = 50
//! "#)?;
//!
//! assert_eq!(config.class_prefix(), "acme-");
//! assert_eq!(config.timings.throttle_ms, 2000);
//! # Ok::<(), tokenscope::Error>(())
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokenscope_style::tokens::DEFAULT_GLOBAL_MARKER;

use crate::{Error, Result};

/// Settings shared by every component of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Common prefix of every token name.
    pub token_prefix: String,
    /// Prefix of token sheet file names (`<prefix>-<name>.css`).
    pub sheet_prefix: String,
    /// Href fragment marking global token sheets.
    pub global_marker: String,
    /// Token name prefixes admitted to the search index.
    pub tier_prefixes: Vec<String>,
    /// Sheets whose tokens are searchable.
    pub searchable_sheets: Vec<String>,
    /// Search field weights.
    pub search: SearchWeights,
    /// Debounce, throttle and fade delays.
    pub timings: Timings,
    /// Space the highlight tooltip needs before it flips sides, in pixels.
    pub tooltip_margin: f64,
    /// Selector of the container holding rendered examples.
    pub example_scope: String,
    /// Class names (by prefix) that are never inspected as components.
    pub banned_classes: Vec<String>,
    /// File name suggested for exported patches.
    pub patch_file_name: String,
}

/// Search field weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchWeights {
    /// Boost of the name-with-spaces field.
    pub name_boost: f64,
    /// Boost of the declared value field.
    pub value_boost: f64,
}

/// Delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Quiet period before a field edit is applied.
    pub debounce_ms: u64,
    /// Minimum spacing between scroll-driven popover dismissals.
    pub throttle_ms: u64,
    /// Delay before a quick highlight starts fading.
    pub fade_ms: u64,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            token_prefix: "--spectrum-".to_string(),
            sheet_prefix: "spectrum".to_string(),
            global_marker: DEFAULT_GLOBAL_MARKER.to_string(),
            tier_prefixes: ["--spectrum-global", "--spectrum-alias", "--spectrum-semantic"]
                .map(String::from)
                .to_vec(),
            searchable_sheets: [
                "animationGlobals",
                "colorAliases",
                "colorGlobals",
                "colorSemantics",
                "dimensionAliases",
                "dimensionGlobals",
                "fontGlobals",
                "staticAliases",
                "light",
                "medium",
            ]
            .map(String::from)
            .to_vec(),
            search: SearchWeights::default(),
            timings: Timings::default(),
            tooltip_margin: 80.0,
            example_scope: ".spectrum-CSSExample-example".to_string(),
            banned_classes: [
                "spectrum-CSSExample",
                "spectrum-CSSComponent",
                "spectrum-Site",
                "spectrum-BigSubtleLink",
            ]
            .map(String::from)
            .to_vec(),
            patch_file_name: "spectrum-custom.css".to_string(),
        }
    }
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            name_boost: 10.0,
            value_boost: 1.0,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            throttle_ms: 2000,
            fade_ms: 100,
        }
    }
}

impl Timings {
    /// Edit debounce delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Popover dismissal throttle.
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Quick highlight fade delay.
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl InspectorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: crate::logging::targets::SESSION, "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Prefix shared by component class names (`spectrum-`).
    pub fn class_prefix(&self) -> String {
        format!("{}-", self.sheet_prefix)
    }

    /// Check whether a sheet's tokens are searchable.
    pub fn is_searchable(&self, sheet: &str) -> bool {
        self.searchable_sheets.iter().any(|s| s == sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = InspectorConfig::default();
        assert_eq!(config.token_prefix, "--spectrum-");
        assert_eq!(config.class_prefix(), "spectrum-");
        assert_eq!(config.timings.debounce(), Duration::from_millis(200));
        assert_eq!(config.search.name_boost, 10.0);
        assert!(config.is_searchable("colorGlobals"));
        assert!(!config.is_searchable("button"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = InspectorConfig::from_toml_str(
            r#"
            tooltip_margin = 40.0
            searchable_sheets = ["tokens"]

            [search]
            value_boost = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.tooltip_margin, 40.0);
        assert_eq!(config.searchable_sheets, vec!["tokens"]);
        assert_eq!(config.search.value_boost, 2.0);
        assert_eq!(config.search.name_boost, 10.0);
        assert_eq!(config.patch_file_name, "spectrum-custom.css");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = InspectorConfig::from_toml_str("tooltip_margin = \"wide\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn file_round_trip() {
        let config = InspectorConfig {
            example_scope: ".demo".to_string(),
            ..Default::default()
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();

        assert_eq!(InspectorConfig::from_file(file.path()).unwrap(), config);
        assert!(InspectorConfig::from_file("/nonexistent/tokenscope.toml").is_err());
    }
}
