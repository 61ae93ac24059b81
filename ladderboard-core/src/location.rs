//! Run metadata encoded in the directory layout.
//!
//! Two layouts are understood:
//!
//! ```text
//! <base>/data/<agent_type>/<branch>/<timestamp>/<run>/results.csv
//! <base>/data/<agent_type>/<timestamp>/<run>/results.csv
//! ```
//!
//! The second (legacy) layout has no branch directory and is reported under
//! the configured default branch.
use chrono::NaiveDateTime;
use std::path::{Component, Path};

use crate::config::DashboardConfig;
use crate::error::LoadError;

/// Metadata attached to every record loaded from one results file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLocation {
    pub file_timestamp: NaiveDateTime,
    pub agent_type: String,
    pub branch: String,
}

impl RunLocation {
    /// Derive the run metadata for a results file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp directory is missing or its name
    /// does not parse with the configured format.
    pub fn from_path(path: &Path, config: &DashboardConfig) -> Result<Self, LoadError> {
        let file_timestamp = parse_file_timestamp(path, &config.timestamp_format)?;
        let (agent_type, branch) = derive_agent_branch(path, config);
        Ok(Self {
            file_timestamp,
            agent_type,
            branch,
        })
    }
}

/// The directory holding the run directory: `<timestamp>` in
/// `<timestamp>/<run>/results.csv`.
#[must_use]
pub fn timestamp_dir(path: &Path) -> Option<&Path> {
    path.parent()?
        .parent()
        .filter(|dir| dir.file_name().is_some())
}

/// Parse the timestamp directory name of a results file.
///
/// # Errors
///
/// Returns [`LoadError::MissingTimestampDir`] when the path is too shallow and
/// [`LoadError::Timestamp`] when the name does not match `format`.
pub fn parse_file_timestamp(path: &Path, format: &str) -> Result<NaiveDateTime, LoadError> {
    let name = timestamp_dir(path)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| LoadError::MissingTimestampDir {
            path: path.display().to_string(),
        })?;

    NaiveDateTime::parse_from_str(&name, format).map_err(|source| LoadError::Timestamp {
        dir: name,
        format: format.to_string(),
        source,
    })
}

/// Resolve `(agent_type, branch)` from the components between the first
/// data segment and the timestamp directory.
#[must_use]
pub fn derive_agent_branch(path: &Path, config: &DashboardConfig) -> (String, String) {
    let prefix: Vec<String> = timestamp_dir(path)
        .and_then(Path::parent)
        .map(normal_components)
        .unwrap_or_default();

    let after_data = prefix
        .iter()
        .position(|segment| *segment == config.data_segment)
        .map(|idx| &prefix[idx + 1..])
        .unwrap_or_default();

    match after_data {
        [agent_type, branch, ..] => (agent_type.clone(), branch.clone()),
        [agent_type] => (agent_type.clone(), config.default_branch.clone()),
        [] => (
            config.unknown_agent_type.clone(),
            config.default_branch.clone(),
        ),
    }
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}
