//! View models for the leaderboard and raw-data views.
//!
//! Renderers only format what these types hold; every decision about
//! ordering, filtering and empty states is made here.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::aggregate::{AgentSuccess, SuccessMatrix, success_by_agent, success_matrix};
use crate::record::RunTable;

pub const EMPTY_LEADERBOARD_MESSAGE: &str = "No results available for the leaderboard.";
pub const EMPTY_RAW_MESSAGE: &str = "No data matches the selected filters.";

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const HEAT_RED: Rgb = Rgb::new(215, 48, 39);
pub const HEAT_YELLOW: Rgb = Rgb::new(254, 224, 139);
pub const HEAT_GREEN: Rgb = Rgb::new(26, 152, 80);

/// Colour of a success rate on the red (0.0) → yellow (0.5) → green (1.0)
/// scale. Out-of-range inputs are clamped.
#[must_use]
pub fn heat_color(rate: f64) -> Rgb {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    if rate <= 0.5 {
        lerp(HEAT_RED, HEAT_YELLOW, rate * 2.0)
    } else {
        lerp(HEAT_YELLOW, HEAT_GREEN, (rate - 0.5) * 2.0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Rgb::new(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b))
}

/// `0.755` → `"75.5%"`; missing rates render as `"n/a"`.
#[must_use]
pub fn format_percent(rate: Option<f64>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0))
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    #[serde(flatten)]
    pub summary: AgentSuccess,
    pub success_pct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub rate: f64,
    pub label: String,
    pub color: Rgb,
}

/// The `(ladder, agent)` grid with display attributes resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub ladders: Vec<String>,
    pub agents: Vec<String>,
    pub cells: Vec<Vec<Option<HeatmapCell>>>,
}

impl Heatmap {
    #[must_use]
    pub fn from_matrix(matrix: &SuccessMatrix) -> Self {
        let cells = matrix
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.map(|rate| HeatmapCell {
                            rate,
                            label: format!("{rate:.2}"),
                            color: heat_color(rate),
                        })
                    })
                    .collect()
            })
            .collect();
        Self {
            ladders: matrix.ladders.clone(),
            agents: matrix.agents.clone(),
            cells,
        }
    }
}

/// Leaderboard table plus heatmap, or the empty-state message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LeaderboardView {
    Empty {
        message: String,
    },
    Ready {
        rows: Vec<LeaderboardRow>,
        heatmap: Heatmap,
        latest_only: bool,
    },
}

impl LeaderboardView {
    /// Build the leaderboard for an already filtered table.
    #[must_use]
    pub fn build(table: &RunTable, latest_only: bool) -> Self {
        if table.is_empty() {
            return Self::Empty {
                message: EMPTY_LEADERBOARD_MESSAGE.to_string(),
            };
        }

        let mut summaries = success_by_agent(table);
        summaries.sort_by(rank_order);
        let rows = summaries
            .into_iter()
            .enumerate()
            .map(|(idx, summary)| LeaderboardRow {
                rank: idx + 1,
                success_pct: format_percent(summary.success_rate),
                summary,
            })
            .collect();

        Self::Ready {
            rows,
            heatmap: Heatmap::from_matrix(&success_matrix(table)),
            latest_only,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Highest rate first, unscored agents last, ties broken by agent id.
fn rank_order(a: &AgentSuccess, b: &AgentSuccess) -> Ordering {
    match (a.success_rate, b.success_rate) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.agent_id.cmp(&b.agent_id))
}

/// Multi-select filters of the raw-data view. `None` selects every value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFilter {
    pub ladders: Option<Vec<String>>,
    pub agents: Option<Vec<String>>,
}

impl RawFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ladders(mut self, ladders: Vec<String>) -> Self {
        self.ladders = Some(ladders);
        self
    }

    #[must_use]
    pub fn with_agents(mut self, agents: Vec<String>) -> Self {
        self.agents = Some(agents);
        self
    }

    fn selects(selection: Option<&Vec<String>>, value: &str) -> bool {
        selection.is_none_or(|values| values.iter().any(|v| v == value))
    }

    #[must_use]
    pub fn apply(&self, table: &RunTable) -> RunTable {
        table.filtered(|record| {
            Self::selects(self.ladders.as_ref(), &record.ladder)
                && Self::selects(self.agents.as_ref(), &record.agent_id)
        })
    }
}

/// Choices offered by the raw-data view's filter widgets, and what is
/// currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub ladders: Vec<String>,
    pub agents: Vec<String>,
    pub selected_ladders: Vec<String>,
    pub selected_agents: Vec<String>,
}

impl FilterOptions {
    #[must_use]
    pub fn new(table: &RunTable, filter: &RawFilter) -> Self {
        let ladders = table.ladders();
        let agents = table.agents();
        Self {
            selected_ladders: filter.ladders.clone().unwrap_or_else(|| ladders.clone()),
            selected_agents: filter.agents.clone().unwrap_or_else(|| agents.clone()),
            ladders,
            agents,
        }
    }
}

/// The filtered table verbatim, or a warning when nothing matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RawDataView {
    Empty {
        options: FilterOptions,
        warning: String,
    },
    Table {
        options: FilterOptions,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl RawDataView {
    #[must_use]
    pub fn build(table: &RunTable, filter: &RawFilter) -> Self {
        let options = FilterOptions::new(table, filter);
        let filtered = filter.apply(table);
        if filtered.is_empty() {
            return Self::Empty {
                options,
                warning: EMPTY_RAW_MESSAGE.to_string(),
            };
        }
        Self::Table {
            options,
            columns: filtered.columns(),
            rows: filtered.rows(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &FilterOptions {
        match self {
            Self::Empty { options, .. } | Self::Table { options, .. } => options,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}
