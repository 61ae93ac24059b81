//! Loading results files into the unified table.
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::DashboardConfig;
use crate::error::LoadError;
use crate::location::RunLocation;
use crate::record::{RunRecord, RunTable, parse_success};
use crate::scan::find_results_files;

/// A results file that was skipped, and why.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Outcome of loading a batch of results files.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub table: RunTable,
    pub failures: Vec<LoadFailure>,
    pub files_loaded: usize,
}

/// Headers and enriched rows of one results file.
#[derive(Debug)]
pub struct LoadedFile {
    pub headers: Vec<String>,
    pub records: Vec<RunRecord>,
}

/// Parse a single results file and attach its run location to every row.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed, its timestamp
/// directory is malformed, a required column is missing, a row has more
/// cells than the header, or a success cell holds an unrecognised value.
/// Rows with fewer cells than the header are kept and blank-filled.
pub fn load_results_file(path: &Path, config: &DashboardConfig) -> Result<LoadedFile, LoadError> {
    let location = RunLocation::from_path(path, config)?;
    let display = path.display().to_string();

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let csv_err = |source| LoadError::Csv {
        path: display.clone(),
        source,
    };

    let headers = dedupe_headers(reader.headers().map_err(csv_err)?.iter());

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: display.clone(),
                column: name.to_string(),
            })
    };
    let ladder_idx = column(&config.ladder_column)?;
    let agent_idx = column(&config.agent_column)?;
    let success_idx = column(&config.success_column)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        if row.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                path: display.clone(),
                row: idx + 1,
                expected: headers.len(),
                found: row.len(),
            });
        }
        let cell = |i: usize| row.get(i).unwrap_or_default().to_string();
        let raw_success = cell(success_idx);
        let success = parse_success(&raw_success).map_err(|err| LoadError::InvalidSuccess {
            path: display.clone(),
            row: idx + 1,
            value: err.0,
        })?;
        let fields: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), cell(i)))
            .collect();

        records.push(RunRecord {
            ladder: cell(ladder_idx),
            agent_id: cell(agent_idx),
            success,
            location: location.clone(),
            fields,
        });
    }

    Ok(LoadedFile { headers, records })
}

/// Repeated header names get a `.1`, `.2`, ... suffix so every cell keeps its
/// own column and lookups by name hit the first occurrence.
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    let mut headers = Vec::new();
    for name in raw {
        let mut header = name.to_string();
        if seen.contains(&header) {
            let count = counts.entry(name).or_insert(0);
            loop {
                *count += 1;
                header = format!("{name}.{count}");
                if !seen.contains(&header) {
                    break;
                }
            }
        }
        seen.insert(header.clone());
        headers.push(header);
    }
    headers
}

/// Load every path into one table. Files that fail are logged and recorded
/// in [`LoadReport::failures`]; they never abort the batch.
#[must_use]
pub fn load_runs(paths: &[PathBuf], config: &DashboardConfig) -> LoadReport {
    let mut report = LoadReport::default();

    for path in paths {
        match load_results_file(path, config) {
            Ok(loaded) => {
                log::debug!(
                    "loaded {} rows from {}",
                    loaded.records.len(),
                    path.display()
                );
                report.table.extend(&loaded.headers, loaded.records);
                report.files_loaded += 1;
            }
            Err(error) => {
                log::warn!("skipping {}: {error}", path.display());
                report.failures.push(LoadFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    log::info!(
        "loaded {} rows from {} files ({} skipped)",
        report.table.len(),
        report.files_loaded,
        report.failures.len()
    );
    report
}

/// Scan `base_dir` and load every results file found beneath it.
#[must_use]
pub fn load_tree(base_dir: &Path, config: &DashboardConfig) -> LoadReport {
    let paths = find_results_files(base_dir, &config.results_file);
    load_runs(&paths, config)
}
