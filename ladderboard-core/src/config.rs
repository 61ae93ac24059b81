//! Layout and column conventions for a results tree.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Describes where runs live on disk and which CSV columns carry the
/// grouping keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Path component that marks the root of the results tree.
    #[serde(default = "DashboardConfig::default_data_segment")]
    pub data_segment: String,
    #[serde(default = "DashboardConfig::default_results_file")]
    pub results_file: String,
    /// `chrono` format of the timestamp directory names.
    #[serde(default = "DashboardConfig::default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "DashboardConfig::default_ladder_column")]
    pub ladder_column: String,
    #[serde(default = "DashboardConfig::default_agent_column")]
    pub agent_column: String,
    #[serde(default = "DashboardConfig::default_success_column")]
    pub success_column: String,
    /// Branch recorded for legacy trees that have no branch directory.
    #[serde(default = "DashboardConfig::default_branch")]
    pub default_branch: String,
    /// Agent type recorded when the path has no data segment.
    #[serde(default = "DashboardConfig::default_unknown_agent_type")]
    pub unknown_agent_type: String,
}

impl DashboardConfig {
    fn default_data_segment() -> String {
        "data".to_string()
    }

    fn default_results_file() -> String {
        "results.csv".to_string()
    }

    fn default_timestamp_format() -> String {
        crate::TIMESTAMP_FORMAT.to_string()
    }

    fn default_ladder_column() -> String {
        "ladder".to_string()
    }

    fn default_agent_column() -> String {
        "agent_id".to_string()
    }

    fn default_success_column() -> String {
        "success".to_string()
    }

    fn default_branch() -> String {
        "main".to_string()
    }

    fn default_unknown_agent_type() -> String {
        "unknown".to_string()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_success_column(mut self, column: impl Into<String>) -> Self {
        self.success_column = column.into();
        self
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_segment: Self::default_data_segment(),
            results_file: Self::default_results_file(),
            timestamp_format: Self::default_timestamp_format(),
            ladder_column: Self::default_ladder_column(),
            agent_column: Self::default_agent_column(),
            success_column: Self::default_success_column(),
            default_branch: Self::default_branch(),
            unknown_agent_type: Self::default_unknown_agent_type(),
        }
    }
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a [`DashboardConfig`] from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    DashboardConfig::from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.success_column, "success");
        assert_eq!(cfg.timestamp_format, "%Y-%m-%d-%H-%M-%S");
    }

    #[test]
    fn partial_config_overrides_selected_fields() {
        let cfg =
            DashboardConfig::from_json(r#"{"success_column":"passed","default_branch":"trunk"}"#)
                .unwrap();
        assert_eq!(cfg.success_column, "passed");
        assert_eq!(cfg.default_branch, "trunk");
        assert_eq!(cfg.data_segment, "data");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = DashboardConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = std::env::temp_dir().join("ladderboard-missing-config.json");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("ladderboard-missing-config.json"));
    }

    #[test]
    fn with_success_column_replaces_name() {
        let cfg = DashboardConfig::default().with_success_column("ok");
        assert_eq!(cfg.success_column, "ok");
    }
}
