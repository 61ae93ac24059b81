//! Success-rate summaries over the unified table.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::record::{RunRecord, RunTable};

/// Grouping used to decide which run counts as the latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatestBy {
    /// Latest run per `agent_id`.
    Agent,
    /// Latest run per `(agent_id, ladder)` pair.
    #[default]
    AgentLadder,
    /// Latest run per `(agent_type, branch)` source directory.
    Source,
}

impl LatestBy {
    fn key(self, record: &RunRecord) -> (String, String) {
        match self {
            Self::Agent => (record.agent_id.clone(), String::new()),
            Self::AgentLadder => (record.agent_id.clone(), record.ladder.clone()),
            Self::Source => (
                record.location.agent_type.clone(),
                record.location.branch.clone(),
            ),
        }
    }
}

/// Keep only records whose `file_timestamp` is the newest in their group.
#[must_use]
pub fn latest_runs(table: &RunTable, by: LatestBy) -> RunTable {
    let mut newest: HashMap<(String, String), NaiveDateTime> = HashMap::new();
    for record in table.records() {
        let ts = record.file_timestamp();
        newest
            .entry(by.key(record))
            .and_modify(|current| {
                if ts > *current {
                    *current = ts;
                }
            })
            .or_insert(ts);
    }

    table.filtered(|record| newest.get(&by.key(record)) == Some(&record.file_timestamp()))
}

/// Overall success of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSuccess {
    pub agent_id: String,
    /// Rows attributed to the agent.
    pub runs: usize,
    /// Rows with a non-blank success value.
    pub scored: usize,
    pub successes: f64,
    /// Distinct ladders the agent has rows for.
    pub ladders: usize,
    /// Mean of the scored success values; `None` when nothing was scored.
    pub success_rate: Option<f64>,
}

/// Success rate of every `(ladder, agent_id)` pair, ladders as rows and
/// agents as columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessMatrix {
    pub ladders: Vec<String>,
    pub agents: Vec<String>,
    /// `cells[row][col]` for `ladders[row]` and `agents[col]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl SuccessMatrix {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ladders.is_empty() || self.agents.is_empty()
    }

    #[must_use]
    pub fn get(&self, ladder: &str, agent: &str) -> Option<f64> {
        let row = self.ladders.iter().position(|l| l == ladder)?;
        let col = self.agents.iter().position(|a| a == agent)?;
        self.cells.get(row)?.get(col).copied().flatten()
    }
}

#[derive(Debug, Default, Clone)]
struct RateBuilder {
    runs: usize,
    scored: usize,
    successes: f64,
    ladders: BTreeSet<String>,
}

impl RateBuilder {
    fn ingest(&mut self, record: &RunRecord) {
        self.runs += 1;
        if let Some(value) = record.success {
            self.scored += 1;
            self.successes += value;
        }
        if !self.ladders.contains(&record.ladder) {
            self.ladders.insert(record.ladder.clone());
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn rate(&self) -> Option<f64> {
        (self.scored > 0).then(|| self.successes / self.scored as f64)
    }

    fn finish(self, agent_id: String) -> AgentSuccess {
        let success_rate = self.rate();
        AgentSuccess {
            agent_id,
            runs: self.runs,
            scored: self.scored,
            successes: self.successes,
            ladders: self.ladders.len(),
            success_rate,
        }
    }
}

/// Mean success per `agent_id`, ordered by agent id.
#[must_use]
pub fn success_by_agent(table: &RunTable) -> Vec<AgentSuccess> {
    let mut builders: BTreeMap<&str, RateBuilder> = BTreeMap::new();
    for record in table.records() {
        builders
            .entry(record.agent_id.as_str())
            .or_default()
            .ingest(record);
    }

    builders
        .into_iter()
        .map(|(agent, builder)| builder.finish(agent.to_string()))
        .collect()
}

/// Mean success per `(ladder, agent_id)`, shaped for a heatmap.
#[must_use]
pub fn success_matrix(table: &RunTable) -> SuccessMatrix {
    let mut builders: BTreeMap<(&str, &str), RateBuilder> = BTreeMap::new();
    for record in table.records() {
        builders
            .entry((record.ladder.as_str(), record.agent_id.as_str()))
            .or_default()
            .ingest(record);
    }

    let ladders = table.ladders();
    let agents = table.agents();
    let cells = ladders
        .iter()
        .map(|ladder| {
            agents
                .iter()
                .map(|agent| {
                    builders
                        .get(&(ladder.as_str(), agent.as_str()))
                        .and_then(RateBuilder::rate)
                })
                .collect()
        })
        .collect();

    SuccessMatrix {
        ladders,
        agents,
        cells,
    }
}
