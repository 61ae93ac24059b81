//! Self-contained HTML dashboard page.
use anyhow::Result;
use std::io::Write;

use ladderboard_core::{DashboardView, FilterOptions, Heatmap, LeaderboardView, RawDataView};

use super::ViewMode;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:left}\
td.num{text-align:right}td.heat{text-align:center;font-variant-numeric:tabular-nums}\
.warning{background:#fff3cd;border:1px solid #ffe08a;padding:.6rem 1rem}\
.filters select{min-width:12rem;margin-right:1rem}";

pub fn generate_html_report(
    out: &mut dyn Write,
    view: &DashboardView,
    mode: ViewMode,
) -> Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head><meta charset=\"utf-8\"><title>Ladderboard</title>")?;
    writeln!(out, "<style>{STYLE}</style></head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>Ladderboard Results</h1>")?;
    writeln!(
        out,
        "<p>{} rows from {} files in <code>{}</code></p>",
        view.total_rows,
        view.files_loaded,
        escape(&view.base_dir)
    )?;

    if !view.load_failures.is_empty() {
        writeln!(
            out,
            "<details><summary>{} skipped files</summary><ul>",
            view.load_failures.len()
        )?;
        for failure in &view.load_failures {
            writeln!(
                out,
                "<li><code>{}</code>: {}</li>",
                escape(&failure.path),
                escape(&failure.error)
            )?;
        }
        writeln!(out, "</ul></details>")?;
    }

    if mode.shows_leaderboard() {
        write_leaderboard(out, &view.leaderboard)?;
    }
    if mode.shows_raw() {
        write_raw(out, &view.raw)?;
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn write_leaderboard(out: &mut dyn Write, view: &LeaderboardView) -> Result<()> {
    writeln!(out, "<section id=\"leaderboard\">")?;
    writeln!(out, "<h2>Leaderboard</h2>")?;
    match view {
        LeaderboardView::Empty { message } => {
            writeln!(out, "<p class=\"warning\">{}</p>", escape(message))?;
        }
        LeaderboardView::Ready {
            rows,
            heatmap,
            latest_only,
        } => {
            if *latest_only {
                writeln!(out, "<p><em>Latest run only.</em></p>")?;
            }
            writeln!(
                out,
                "<table><thead><tr><th>Rank</th><th>Agent</th><th>Success rate</th>\
                 <th>Runs</th><th>Ladders</th></tr></thead><tbody>"
            )?;
            for row in rows {
                writeln!(
                    out,
                    "<tr><td class=\"num\">{}</td><td>{}</td><td class=\"num\">{}</td>\
                     <td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                    row.rank,
                    escape(&row.summary.agent_id),
                    row.success_pct,
                    row.summary.runs,
                    row.summary.ladders
                )?;
            }
            writeln!(out, "</tbody></table>")?;
            write_heatmap(out, heatmap)?;
        }
    }
    writeln!(out, "</section>")?;
    Ok(())
}

fn write_heatmap(out: &mut dyn Write, heatmap: &Heatmap) -> Result<()> {
    writeln!(out, "<h3>Success Rate by Ladder</h3>")?;
    write!(out, "<table class=\"heatmap\"><thead><tr><th>Ladder</th>")?;
    for agent in &heatmap.agents {
        write!(out, "<th>{}</th>", escape(agent))?;
    }
    writeln!(out, "</tr></thead><tbody>")?;
    for (ladder, row) in heatmap.ladders.iter().zip(&heatmap.cells) {
        write!(out, "<tr><th>{}</th>", escape(ladder))?;
        for cell in row {
            match cell {
                Some(cell) => write!(
                    out,
                    "<td class=\"heat\" style=\"background:{}\">{}</td>",
                    cell.color.hex(),
                    cell.label
                )?,
                None => write!(out, "<td class=\"heat\"></td>")?,
            }
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</tbody></table>")?;
    Ok(())
}

fn write_raw(out: &mut dyn Write, view: &RawDataView) -> Result<()> {
    writeln!(out, "<section id=\"raw-data\">")?;
    writeln!(out, "<h2>Raw Data</h2>")?;
    write_filters(out, view.options())?;
    match view {
        RawDataView::Empty { warning, .. } => {
            writeln!(out, "<p class=\"warning\">{}</p>", escape(warning))?;
        }
        RawDataView::Table { columns, rows, .. } => {
            write!(out, "<table><thead><tr>")?;
            for column in columns {
                write!(out, "<th>{}</th>", escape(column))?;
            }
            writeln!(out, "</tr></thead><tbody>")?;
            for row in rows {
                write!(out, "<tr>")?;
                for cell in row {
                    write!(out, "<td>{}</td>", escape(cell))?;
                }
                writeln!(out, "</tr>")?;
            }
            writeln!(out, "</tbody></table>")?;
        }
    }
    writeln!(out, "</section>")?;
    Ok(())
}

fn write_filters(out: &mut dyn Write, options: &FilterOptions) -> Result<()> {
    writeln!(out, "<form class=\"filters\">")?;
    write_select(out, "ladder", &options.ladders, &options.selected_ladders)?;
    write_select(out, "agent_id", &options.agents, &options.selected_agents)?;
    writeln!(out, "</form>")?;
    Ok(())
}

fn write_select(
    out: &mut dyn Write,
    name: &str,
    values: &[String],
    selected: &[String],
) -> Result<()> {
    writeln!(out, "<label>{name} <select name=\"{name}\" multiple disabled>")?;
    for value in values {
        let attr = if selected.contains(value) { " selected" } else { "" };
        writeln!(out, "<option{attr}>{}</option>", escape(value))?;
    }
    writeln!(out, "</select></label>")?;
    Ok(())
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
