use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use ladderboard_core::{
    DashboardView, FailureSummary, FilterOptions, Heatmap, LeaderboardRow, LeaderboardView,
    RawDataView,
};

use super::{ViewMode, text_table};

pub fn generate_console_report(
    out: &mut dyn Write,
    view: &DashboardView,
    mode: ViewMode,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==================".cyan())?;
    writeln!(out, "Base directory: {}", view.base_dir)?;
    writeln!(out, "Files loaded: {}", view.files_loaded.to_string().green())?;
    writeln!(out, "Rows: {}", view.total_rows)?;
    write_failures(out, &view.load_failures)?;

    if mode.shows_leaderboard() {
        write_leaderboard(out, &view.leaderboard)?;
    }
    if mode.shows_raw() {
        write_raw(out, &view.raw)?;
    }
    Ok(())
}

fn write_failures(out: &mut dyn Write, failures: &[FailureSummary]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(out, "Skipped: {}", failures.len().to_string().red())?;
    for failure in failures {
        writeln!(out, "   • {}: {}", failure.path, failure.error.red())?;
    }
    Ok(())
}

fn write_leaderboard(out: &mut dyn Write, view: &LeaderboardView) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🏆 Leaderboard".bright_yellow().bold())?;
    writeln!(out, "{}", "==============".yellow())?;

    let (rows, heatmap, latest_only) = match view {
        LeaderboardView::Empty { message } => {
            writeln!(out, "⚠️  {}", message.yellow())?;
            return Ok(());
        }
        LeaderboardView::Ready {
            rows,
            heatmap,
            latest_only,
        } => (rows, heatmap, *latest_only),
    };

    if latest_only {
        writeln!(out, "{}", "(latest run only)".dimmed())?;
    }

    let headers = ["Rank", "Agent", "Success", "Runs", "Ladders"].map(String::from);
    let cells: Vec<Vec<String>> = rows.iter().map(leaderboard_cells).collect();
    for line in text_table(&headers, &cells) {
        writeln!(out, "{line}")?;
    }

    write_heatmap(out, heatmap)
}

fn leaderboard_cells(row: &LeaderboardRow) -> Vec<String> {
    vec![
        row.rank.to_string(),
        row.summary.agent_id.clone(),
        row.success_pct.clone(),
        row.summary.runs.to_string(),
        row.summary.ladders.to_string(),
    ]
}

fn write_heatmap(out: &mut dyn Write, heatmap: &Heatmap) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🔥 Success Rate by Ladder".bright_yellow().bold())?;
    writeln!(out, "{}", "=========================".yellow())?;

    let ladder_width = heatmap
        .ladders
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("ladder".len());
    let col_widths: Vec<usize> = heatmap
        .agents
        .iter()
        .map(|a| a.chars().count().max(4))
        .collect();

    let mut header = format!("{:<ladder_width$}", "ladder");
    for (agent, width) in heatmap.agents.iter().zip(col_widths.iter().copied()) {
        header.push_str(&format!("  {agent:>width$}"));
    }
    writeln!(out, "{}", header.bold())?;

    for (ladder, row) in heatmap.ladders.iter().zip(&heatmap.cells) {
        write!(out, "{ladder:<ladder_width$}")?;
        for (cell, width) in row.iter().zip(col_widths.iter().copied()) {
            match cell {
                Some(cell) => {
                    let label = format!("{:>width$}", cell.label);
                    let (r, g, b) = (cell.color.r, cell.color.g, cell.color.b);
                    write!(out, "  {}", label.black().on_truecolor(r, g, b))?;
                }
                None => write!(out, "  {:>width$}", "-")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_raw(out: &mut dyn Write, view: &RawDataView) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📋 Raw Data".bright_blue().bold())?;
    writeln!(out, "{}", "===========".blue())?;
    write_filter_options(out, view.options())?;

    match view {
        RawDataView::Empty { warning, .. } => {
            writeln!(out, "⚠️  {}", warning.yellow())?;
        }
        RawDataView::Table { columns, rows, .. } => {
            for line in text_table(columns, rows) {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "{} rows", rows.len())?;
        }
    }
    Ok(())
}

fn write_filter_options(out: &mut dyn Write, options: &FilterOptions) -> Result<()> {
    writeln!(
        out,
        "Ladders ({}/{}): {}",
        options.selected_ladders.len(),
        options.ladders.len(),
        options.selected_ladders.join(", ")
    )?;
    writeln!(
        out,
        "Agents ({}/{}): {}",
        options.selected_agents.len(),
        options.agents.len(),
        options.selected_agents.join(", ")
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{empty_view, filtered_view, sample_view};
    use ladderboard_core::RawFilter;

    fn render(view: &DashboardView, mode: ViewMode) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, view, mode).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn console_report_ranks_agents() {
        let content = render(&sample_view("console-rank"), ViewMode::Leaderboard);
        assert!(content.contains("Leaderboard"));
        let b = content.find("agentB").unwrap();
        let a = content.find("agentA").unwrap();
        assert!(b < a, "agentB (100%) should rank above agentA (50%)");
        assert!(content.contains("100.0%"));
        assert!(content.contains("50.0%"));
        assert!(content.contains("Success Rate by Ladder"));
        assert!(!content.contains("Raw Data"));
    }

    #[test]
    fn console_report_empty_leaderboard_warns() {
        let content = render(&empty_view(), ViewMode::Both);
        assert!(content.contains("No results available for the leaderboard."));
        assert!(content.contains("No data matches the selected filters."));
    }

    #[test]
    fn console_raw_view_lists_rows_and_filters() {
        let filter = RawFilter::all().with_agents(vec!["agentB".to_string()]);
        let content = render(&filtered_view("console-raw", filter), ViewMode::Raw);
        assert!(content.contains("Agents (1/2): agentB"));
        assert!(content.contains("Ladders (2/2): creature, rps"));
        assert!(content.contains("2 rows"));
        assert!(content.contains("file_timestamp"));
    }
}
