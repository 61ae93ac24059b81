//! Run records and the unified table they are concatenated into.
use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};

use crate::error::SuccessParseError;
use crate::location::RunLocation;

/// Derived columns appended to every table, in display order.
pub const FILE_TIMESTAMP_COLUMN: &str = "file_timestamp";
pub const AGENT_TYPE_COLUMN: &str = "agent_type";
pub const BRANCH_COLUMN: &str = "branch";
pub const DERIVED_COLUMNS: [&str; 3] = [FILE_TIMESTAMP_COLUMN, AGENT_TYPE_COLUMN, BRANCH_COLUMN];

/// One row of a `results.csv`, enriched with its run location.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub ladder: String,
    pub agent_id: String,
    /// `None` when the success cell was blank.
    pub success: Option<f64>,
    pub location: RunLocation,
    /// Every CSV cell of the row keyed by header, verbatim.
    pub fields: HashMap<String, String>,
}

impl RunRecord {
    #[must_use]
    pub fn file_timestamp(&self) -> NaiveDateTime {
        self.location.file_timestamp
    }

    #[must_use]
    pub fn agent_type(&self) -> &str {
        &self.location.agent_type
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.location.branch
    }

    /// Cell value for any table column, derived columns included. Columns
    /// the source file did not have render as an empty cell.
    #[must_use]
    pub fn value(&self, column: &str) -> String {
        match column {
            FILE_TIMESTAMP_COLUMN => self
                .location
                .file_timestamp
                .format(crate::TIMESTAMP_FORMAT)
                .to_string(),
            AGENT_TYPE_COLUMN => self.location.agent_type.clone(),
            BRANCH_COLUMN => self.location.branch.clone(),
            other => self.fields.get(other).cloned().unwrap_or_default(),
        }
    }
}

/// Parse a success cell. Blank cells are missing, not failures.
///
/// # Errors
///
/// Returns [`SuccessParseError`] for values that are neither a recognised
/// flag nor a number in `[0, 1]`.
pub fn parse_success(raw: &str) -> Result<Option<f64>, SuccessParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "pass" | "passed" | "success" => return Ok(Some(1.0)),
        "false" | "no" | "fail" | "failed" | "failure" => return Ok(Some(0.0)),
        _ => {}
    }
    match value.parse::<f64>() {
        Ok(number) if (0.0..=1.0).contains(&number) => Ok(Some(number)),
        _ => Err(SuccessParseError(value.to_string())),
    }
}

/// The concatenation of every successfully loaded results file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTable {
    columns: Vec<String>,
    records: Vec<RunRecord>,
}

impl RunTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the rows of one file, extending the column list with any
    /// header not seen before.
    pub fn extend(&mut self, headers: &[String], records: Vec<RunRecord>) {
        for header in headers {
            if DERIVED_COLUMNS.contains(&header.as_str()) {
                continue;
            }
            if !self.columns.iter().any(|c| c == header) {
                self.columns.push(header.clone());
            }
        }
        self.records.extend(records);
    }

    /// CSV columns in first-seen order followed by the derived columns.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        if self.records.is_empty() && self.columns.is_empty() {
            return Vec::new();
        }
        self.columns
            .iter()
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|c| (*c).to_string()))
            .collect()
    }

    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A table with the same columns holding only the records `keep` accepts.
    #[must_use]
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&RunRecord) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Distinct ladders, sorted.
    #[must_use]
    pub fn ladders(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.ladder.as_str()))
    }

    /// Distinct agent ids, sorted.
    #[must_use]
    pub fn agents(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.agent_id.as_str()))
    }

    /// Rows as ordered cell vectors matching [`RunTable::columns`].
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.records
            .iter()
            .map(|record| columns.iter().map(|c| record.value(c)).collect())
            .collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
