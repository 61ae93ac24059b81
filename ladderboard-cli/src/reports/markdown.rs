use anyhow::Result;
use std::io::Write;

use ladderboard_core::{DashboardView, Heatmap, LeaderboardView, RawDataView};

use super::ViewMode;

pub fn generate_markdown_report(
    out: &mut dyn Write,
    view: &DashboardView,
    mode: ViewMode,
) -> Result<()> {
    writeln!(out, "# Ladderboard Results\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Base directory**: `{}`", view.base_dir)?;
    writeln!(out, "- **Files loaded**: {}", view.files_loaded)?;
    writeln!(out, "- **Rows**: {}", view.total_rows)?;
    if !view.load_failures.is_empty() {
        writeln!(out, "- **Skipped files**:")?;
        for failure in &view.load_failures {
            writeln!(out, "  - `{}`: {}", failure.path, failure.error)?;
        }
    }
    writeln!(out)?;

    if mode.shows_leaderboard() {
        write_leaderboard(out, &view.leaderboard)?;
    }
    if mode.shows_raw() {
        write_raw(out, &view.raw)?;
    }
    Ok(())
}

fn write_leaderboard(out: &mut dyn Write, view: &LeaderboardView) -> Result<()> {
    writeln!(out, "## Leaderboard\n")?;
    let (rows, heatmap, latest_only) = match view {
        LeaderboardView::Empty { message } => {
            writeln!(out, "_{message}_\n")?;
            return Ok(());
        }
        LeaderboardView::Ready {
            rows,
            heatmap,
            latest_only,
        } => (rows, heatmap, *latest_only),
    };

    if latest_only {
        writeln!(out, "_Latest run only._\n")?;
    }
    writeln!(out, "| Rank | Agent | Success rate | Runs | Ladders |")?;
    writeln!(out, "| ---: | --- | ---: | ---: | ---: |")?;
    for row in rows {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            row.rank,
            escape_cell(&row.summary.agent_id),
            row.success_pct,
            row.summary.runs,
            row.summary.ladders
        )?;
    }
    writeln!(out)?;

    write_heatmap(out, heatmap)
}

fn write_heatmap(out: &mut dyn Write, heatmap: &Heatmap) -> Result<()> {
    writeln!(out, "### Success Rate by Ladder\n")?;
    let agents: Vec<String> = heatmap.agents.iter().map(|a| escape_cell(a)).collect();
    writeln!(out, "| Ladder | {} |", agents.join(" | "))?;
    writeln!(out, "| --- |{}", " ---: |".repeat(agents.len()))?;
    for (ladder, row) in heatmap.ladders.iter().zip(&heatmap.cells) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                cell.as_ref().map_or_else(|| "-".to_string(), |c| c.label.clone())
            })
            .collect();
        writeln!(out, "| {} | {} |", escape_cell(ladder), cells.join(" | "))?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_raw(out: &mut dyn Write, view: &RawDataView) -> Result<()> {
    writeln!(out, "## Raw Data\n")?;
    let options = view.options();
    writeln!(out, "- **Ladders**: {}", options.selected_ladders.join(", "))?;
    writeln!(out, "- **Agents**: {}\n", options.selected_agents.join(", "))?;

    match view {
        RawDataView::Empty { warning, .. } => {
            writeln!(out, "> ⚠️ {warning}\n")?;
        }
        RawDataView::Table { columns, rows, .. } => {
            let header: Vec<String> = columns.iter().map(|c| escape_cell(c)).collect();
            writeln!(out, "| {} |", header.join(" | "))?;
            writeln!(out, "|{}", " --- |".repeat(columns.len()))?;
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
                writeln!(out, "| {} |", cells.join(" | "))?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
