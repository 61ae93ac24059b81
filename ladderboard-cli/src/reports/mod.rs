pub mod console;
pub mod html;
pub mod markdown;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

use ladderboard_core::{DashboardView, FailureSummary, LeaderboardView, RawDataView};

pub use console::generate_console_report;
pub use html::generate_html_report;
pub use markdown::generate_markdown_report;

/// Which views a report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    /// Success-rate table and heatmap
    Leaderboard,
    /// Filtered run records
    Raw,
    /// Leaderboard followed by raw data
    Both,
}

impl ViewMode {
    pub const fn shows_leaderboard(self) -> bool {
        matches!(self, Self::Leaderboard | Self::Both)
    }

    pub const fn shows_raw(self) -> bool {
        matches!(self, Self::Raw | Self::Both)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    base_dir: &'a str,
    files_loaded: usize,
    total_rows: usize,
    load_failures: &'a [FailureSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    leaderboard: Option<&'a LeaderboardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<&'a RawDataView>,
}

pub fn generate_json_report(
    out: &mut dyn Write,
    view: &DashboardView,
    mode: ViewMode,
) -> Result<()> {
    let report = JsonReport {
        base_dir: &view.base_dir,
        files_loaded: view.files_loaded,
        total_rows: view.total_rows,
        load_failures: &view.load_failures,
        leaderboard: mode.shows_leaderboard().then_some(&view.leaderboard),
        raw: mode.shows_raw().then_some(&view.raw),
    };
    let json_output = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

/// CSV export: leaderboard rows in leaderboard mode, otherwise the filtered
/// raw table. Empty views write nothing and return their message.
pub fn generate_csv_report(
    out: &mut dyn Write,
    view: &DashboardView,
    mode: ViewMode,
) -> Result<Option<String>> {
    let mut writer = csv::Writer::from_writer(out);

    if mode == ViewMode::Leaderboard {
        let rows = match &view.leaderboard {
            LeaderboardView::Empty { message } => return Ok(Some(message.clone())),
            LeaderboardView::Ready { rows, .. } => rows,
        };
        writer.write_record([
            "rank",
            "agent_id",
            "success_rate",
            "runs",
            "scored",
            "successes",
            "ladders",
        ])?;
        for row in rows {
            let summary = &row.summary;
            writer.write_record([
                row.rank.to_string(),
                summary.agent_id.clone(),
                summary
                    .success_rate
                    .map(|r| format!("{r:.4}"))
                    .unwrap_or_default(),
                summary.runs.to_string(),
                summary.scored.to_string(),
                summary.successes.to_string(),
                summary.ladders.to_string(),
            ])?;
        }
    } else {
        let (columns, rows) = match &view.raw {
            RawDataView::Empty { warning, .. } => return Ok(Some(warning.clone())),
            RawDataView::Table { columns, rows, .. } => (columns, rows),
        };
        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(row)?;
        }
    }

    writer.flush()?;
    Ok(None)
}

/// Left-aligned plain-text table with two-space gutters.
pub fn text_table(headers: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(headers));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| format_line(row)));
    lines
}

#[cfg(test)]
pub(crate) mod fixtures {
    use ladderboard_core::{Dashboard, DashboardView, LoadReport, RawFilter, RunTable, ViewRequest};
    use std::path::Path;

    pub fn write_tree(label: &str) -> std::path::PathBuf {
        let root = std::env::temp_dir().join(format!(
            "ladderboard-reports-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        for (rel, body) in [
            (
                "data/agentA/main/2024-01-01-00-00-00/x",
                "ladder,agent_id,success\nrps,agentA,1\nrps,agentA,0\n",
            ),
            (
                "data/agentB/main/2024-01-01-00-00-00/x",
                "ladder,agent_id,success\nrps,agentB,1\ncreature,agentB,1\n",
            ),
        ] {
            let dir = root.join(rel);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("results.csv"), body).unwrap();
        }
        root
    }

    pub fn sample_view(label: &str) -> DashboardView {
        let root = write_tree(label);
        Dashboard::new(root, ladderboard_core::DashboardConfig::default())
            .handle(&ViewRequest::default())
    }

    pub fn filtered_view(label: &str, filter: RawFilter) -> DashboardView {
        let root = write_tree(label);
        let request = ViewRequest {
            filter,
            ..ViewRequest::default()
        };
        Dashboard::new(root, ladderboard_core::DashboardConfig::default()).handle(&request)
    }

    pub fn empty_view() -> DashboardView {
        let report = LoadReport {
            table: RunTable::new(),
            failures: Vec::new(),
            files_loaded: 0,
        };
        Dashboard::render(Path::new("empty"), &report, &ViewRequest::default())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{empty_view, filtered_view, sample_view};
    use super::*;
    use ladderboard_core::RawFilter;

    #[test]
    fn json_report_respects_view_mode() {
        let view = sample_view("json-mode");
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &view, ViewMode::Leaderboard).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["leaderboard"]["state"], "ready");
        assert!(value.get("raw").is_none());
        assert_eq!(value["total_rows"], 4);
    }

    #[test]
    fn csv_report_exports_raw_rows() {
        let view = sample_view("csv-raw");
        let mut buffer = Vec::new();
        let warning = generate_csv_report(&mut buffer, &view, ViewMode::Both).unwrap();
        assert!(warning.is_none());
        let content = String::from_utf8(buffer).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("ladder,agent_id,success,file_timestamp,agent_type,branch")
        );
        assert_eq!(content.lines().count(), 5);
    }

    #[test]
    fn csv_report_exports_leaderboard() {
        let view = sample_view("csv-board");
        let mut buffer = Vec::new();
        generate_csv_report(&mut buffer, &view, ViewMode::Leaderboard).unwrap();
        let content = String::from_utf8(buffer).unwrap();
        assert!(content.starts_with("rank,agent_id,success_rate"));
        assert!(content.contains("1,agentB,1.0000,2,2,2,2"));
        assert!(content.contains("2,agentA,0.5000,2,2,1,1"));
    }

    #[test]
    fn csv_report_returns_warning_for_empty_selection() {
        let view = filtered_view("csv-empty", RawFilter::all().with_ladders(vec![]));
        let mut buffer = Vec::new();
        let warning = generate_csv_report(&mut buffer, &view, ViewMode::Raw).unwrap();
        assert!(warning.unwrap().contains("No data matches"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn csv_leaderboard_empty_state() {
        let mut buffer = Vec::new();
        let warning =
            generate_csv_report(&mut buffer, &empty_view(), ViewMode::Leaderboard).unwrap();
        assert!(warning.is_some());
    }

    #[test]
    fn text_table_pads_columns() {
        let lines = text_table(
            &["a".to_string(), "long header".to_string()],
            &[vec!["wide cell".to_string(), "x".to_string()]],
        );
        assert_eq!(lines[0], "a          long header");
        assert_eq!(lines[1], "---------  -----------");
        assert_eq!(lines[2], "wide cell  x");
    }
}
