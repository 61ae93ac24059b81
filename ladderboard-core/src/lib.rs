//! Ladderboard Core
//!
//! Results pipeline for benchmark run trees: discover `results.csv` files,
//! enrich their rows with the run metadata encoded in the directory layout,
//! and derive leaderboard and raw-data view models. Rendering lives in the
//! CLI crate.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod location;
pub mod record;
pub mod scan;
pub mod views;

/// Directory-name format of a run's timestamp directory.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

// Re-export commonly used types
pub use aggregate::{
    AgentSuccess, LatestBy, SuccessMatrix, latest_runs, success_by_agent, success_matrix,
};
pub use config::{ConfigError, DashboardConfig, load_config};
pub use dashboard::{Dashboard, DashboardView, FailureSummary, ViewRequest};
pub use error::{LoadError, SuccessParseError};
pub use loader::{LoadFailure, LoadReport, LoadedFile, load_results_file, load_runs, load_tree};
pub use location::{RunLocation, derive_agent_branch, parse_file_timestamp};
pub use record::{RunRecord, RunTable, parse_success};
pub use scan::find_results_files;
pub use views::{
    FilterOptions, Heatmap, HeatmapCell, LeaderboardRow, LeaderboardView, RawDataView, RawFilter,
    Rgb, format_percent, heat_color,
};
