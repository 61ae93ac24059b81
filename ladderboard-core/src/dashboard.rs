//! Request handler tying scan, load, aggregation and views together.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::aggregate::{LatestBy, latest_runs};
use crate::config::DashboardConfig;
use crate::loader::{LoadReport, load_tree};
use crate::views::{LeaderboardView, RawDataView, RawFilter};

/// Parameters of one dashboard request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    /// Restrict the leaderboard to the latest run of each group.
    pub latest_only: bool,
    pub latest_by: LatestBy,
    pub filter: RawFilter,
}

/// A results file that could not be loaded, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub path: String,
    pub error: String,
}

/// Everything a renderer needs for one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub base_dir: String,
    pub files_loaded: usize,
    pub total_rows: usize,
    pub load_failures: Vec<FailureSummary>,
    pub leaderboard: LeaderboardView,
    pub raw: RawDataView,
}

/// Serves view models for a results tree. Holds no state between requests:
/// every call rescans and reloads from disk.
#[derive(Debug, Clone)]
pub struct Dashboard {
    base_dir: PathBuf,
    config: DashboardConfig,
}

impl Dashboard {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>, config: DashboardConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
        }
    }

    /// Scan and load the tree.
    #[must_use]
    pub fn load(&self) -> LoadReport {
        load_tree(&self.base_dir, &self.config)
    }

    /// Answer a request from a fresh load.
    #[must_use]
    pub fn handle(&self, request: &ViewRequest) -> DashboardView {
        let report = self.load();
        Self::render(&self.base_dir, &report, request)
    }

    /// Build the view model for an already loaded tree.
    #[must_use]
    pub fn render(base_dir: &Path, report: &LoadReport, request: &ViewRequest) -> DashboardView {
        let leaderboard = if request.latest_only {
            LeaderboardView::build(&latest_runs(&report.table, request.latest_by), true)
        } else {
            LeaderboardView::build(&report.table, false)
        };
        let raw = RawDataView::build(&report.table, &request.filter);

        DashboardView {
            base_dir: base_dir.display().to_string(),
            files_loaded: report.files_loaded,
            total_rows: report.table.len(),
            load_failures: report
                .failures
                .iter()
                .map(|failure| FailureSummary {
                    path: failure.path.display().to_string(),
                    error: failure.error.to_string(),
                })
                .collect(),
            leaderboard,
            raw,
        }
    }
}
