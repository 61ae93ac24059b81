use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ladderboard_core::{
    Dashboard, DashboardConfig, LatestBy, LeaderboardView, RawDataView, RawFilter, ViewRequest,
    latest_runs, load_tree, success_by_agent, success_matrix,
};

fn temp_tree(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ladderboard-pipeline-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).expect("create temp tree");
    dir
}

fn write_run(root: &Path, rel: &str, body: &str) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).expect("create run dir");
    fs::write(dir.join("results.csv"), body).expect("write results");
}

fn two_run_tree(label: &str) -> PathBuf {
    let root = temp_tree(label);
    write_run(
        &root,
        "data/agentA/branch1/2024-01-01-00-00-00/x",
        "ladder,agent_id,success\nrps,agentA,1\nrps,agentA,0\n",
    );
    write_run(
        &root,
        "data/agentA/branch1/2024-01-02-00-00-00/x",
        "ladder,agent_id,success\nrps,agentA,1\nrps,agentA,1\n",
    );
    root
}

#[test]
fn all_runs_versus_latest_run_success_rate() {
    let root = two_run_tree("rates");
    let report = load_tree(&root, &DashboardConfig::default());
    assert_eq!(report.table.len(), 4);
    assert!(report.failures.is_empty());

    let all = success_by_agent(&report.table);
    assert_eq!(all[0].agent_id, "agentA");
    assert_eq!(all[0].success_rate, Some(0.75));

    let latest = success_by_agent(&latest_runs(&report.table, LatestBy::Agent));
    assert_eq!(latest[0].success_rate, Some(1.0));
}

#[test]
fn new_and_legacy_layouts_side_by_side() {
    let root = temp_tree("layouts");
    write_run(
        &root,
        "data/claude/feature-x/2024-02-01-10-20-30/run-1",
        "ladder,agent_id,success\ncreature,claude,true\n",
    );
    write_run(
        &root,
        "data/gpt/2024-02-01-10-20-30/run-1",
        "ladder,agent_id,success\ncreature,gpt,false\n",
    );
    let report = load_tree(&root, &DashboardConfig::default());
    assert_eq!(report.table.len(), 2);

    for record in report.table.records() {
        match record.agent_id.as_str() {
            "claude" => {
                assert_eq!(record.agent_type(), "claude");
                assert_eq!(record.branch(), "feature-x");
            }
            "gpt" => {
                assert_eq!(record.agent_type(), "gpt");
                assert_eq!(record.branch(), "main");
            }
            other => panic!("unexpected agent {other}"),
        }
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|d| d.and_hms_opt(10, 20, 30))
            .expect("valid timestamp");
        assert_eq!(record.file_timestamp(), expected);
    }

    let matrix = success_matrix(&report.table);
    assert_eq!(matrix.get("creature", "claude"), Some(1.0));
    assert_eq!(matrix.get("creature", "gpt"), Some(0.0));
}

#[test]
fn broken_files_do_not_abort_the_load() {
    let root = two_run_tree("broken");
    write_run(
        &root,
        "data/agentB/main/not-a-timestamp/x",
        "ladder,agent_id,success\nrps,agentB,1\n",
    );
    write_run(
        &root,
        "data/agentC/main/2024-01-03-00-00-00/x",
        "ladder,agent_id\nrps,agentC\n",
    );
    let report = load_tree(&root, &DashboardConfig::default());
    assert_eq!(report.table.len(), 4);
    assert_eq!(report.files_loaded, 2);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.table.agents(), vec!["agentA"]);
}

#[test]
fn extra_columns_are_preserved_verbatim() {
    let root = temp_tree("extra");
    write_run(
        &root,
        "data/agentA/main/2024-01-01-00-00-00/x",
        "ladder,agent_id,success,test_name\nrps,agentA,1,test_draw\n",
    );
    write_run(
        &root,
        "data/agentA/main/2024-01-02-00-00-00/x",
        "ladder,agent_id,success,duration_s\nrps,agentA,0,1.25\n",
    );
    let view = Dashboard::new(&root, DashboardConfig::default()).handle(&ViewRequest::default());
    let RawDataView::Table { columns, rows, .. } = view.raw else {
        panic!("expected a raw table");
    };
    assert_eq!(
        columns,
        vec![
            "ladder",
            "agent_id",
            "success",
            "test_name",
            "duration_s",
            "file_timestamp",
            "agent_type",
            "branch"
        ]
    );
    assert_eq!(rows[0][3], "test_draw");
    assert_eq!(rows[0][4], "");
    assert_eq!(rows[1][4], "1.25");
}

#[test]
fn empty_tree_renders_empty_states() {
    let root = temp_tree("empty");
    let view = Dashboard::new(&root, DashboardConfig::default()).handle(&ViewRequest::default());
    assert_eq!(view.total_rows, 0);
    assert!(matches!(view.leaderboard, LeaderboardView::Empty { .. }));
    assert!(matches!(view.raw, RawDataView::Empty { .. }));
}

#[test]
fn raw_filter_with_no_matching_rows_warns() {
    let root = two_run_tree("filter");
    let request = ViewRequest {
        filter: RawFilter::all().with_agents(vec!["nobody".to_string()]),
        ..ViewRequest::default()
    };
    let view = Dashboard::new(&root, DashboardConfig::default()).handle(&request);
    match view.raw {
        RawDataView::Empty { warning, .. } => assert!(warning.contains("No data")),
        RawDataView::Table { .. } => panic!("filtered view should be empty"),
    }
    assert!(!view.leaderboard.is_empty());
}

#[test]
fn every_request_rescans_the_tree() {
    let root = two_run_tree("rescan");
    let dashboard = Dashboard::new(&root, DashboardConfig::default());
    assert_eq!(dashboard.handle(&ViewRequest::default()).total_rows, 4);

    write_run(
        &root,
        "data/agentB/main/2024-01-05-00-00-00/x",
        "ladder,agent_id,success\nrps,agentB,1\n",
    );
    assert_eq!(dashboard.handle(&ViewRequest::default()).total_rows, 5);
}
