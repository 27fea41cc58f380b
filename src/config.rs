//! Options for a rescale run.
//!
//! Everything has a default, so an options file only needs the keys it changes:
//!
//! ```json
//! { "resetLineHeights": true, "paddingTable": [{"upTo": 16}, {"ratio": 8}] }
//! ```

use crate::scale::ScaleTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file couldn't be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The options weren't valid JSON or held an invalid scale table.
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for a single rescale invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RescaleOptions {
    /// Force every text node's line height to auto instead of rescaling it
    pub reset_line_heights: bool,
    /// Table for padding, item spacing and grid values
    pub padding_table: ScaleTable,
    /// Table for font sizes and pixel line heights
    pub font_table: ScaleTable,
}

impl Default for RescaleOptions {
    fn default() -> Self {
        Self {
            reset_line_heights: false,
            padding_table: ScaleTable::padding(),
            font_table: ScaleTable::font(),
        }
    }
}

impl RescaleOptions {
    /// Parses options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_json(&json)?;
        log::debug!("Loaded options from {}", path.display());
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::scale;

    #[test]
    fn test_defaults() {
        let options = RescaleOptions::default();
        assert!(!options.reset_line_heights);
        assert_eq!(options.padding_table, ScaleTable::padding());
        assert_eq!(options.font_table, ScaleTable::font());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let options = RescaleOptions::from_json("{}").unwrap();
        assert_eq!(options, RescaleOptions::default());
    }

    #[test]
    fn test_partial_override() {
        let options = RescaleOptions::from_json(
            r#"{"resetLineHeights": true, "paddingTable": [{"upTo": 16}, {"ratio": 8}]}"#,
        )
        .unwrap();
        assert!(options.reset_line_heights);
        assert_eq!(scale(32.0, &options.padding_table), 16.0);
        assert_eq!(options.font_table, ScaleTable::font());
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let result = RescaleOptions::from_json(
            r#"{"fontTable": [{"ratio": 4}, {"upTo": 16}]}"#,
        );
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RescaleOptions::load("/nonexistent/options.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/options.json"));
    }

    #[test]
    fn test_round_trip_through_json() {
        let options = RescaleOptions {
            reset_line_heights: true,
            ..RescaleOptions::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(RescaleOptions::from_json(&json).unwrap(), options);
    }
}
