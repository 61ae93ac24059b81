mod common;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use common::selection;
use ladderboard_core::{
    Dashboard, DashboardConfig, DashboardView, LatestBy, RawFilter, ViewRequest, load_config,
};
use reports::ViewMode;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LatestGrouping {
    /// Newest run per agent
    Agent,
    /// Newest run per agent and ladder
    AgentLadder,
    /// Newest run per agent_type/branch directory
    Source,
}

impl From<LatestGrouping> for LatestBy {
    fn from(value: LatestGrouping) -> Self {
        match value {
            LatestGrouping::Agent => Self::Agent,
            LatestGrouping::AgentLadder => Self::AgentLadder,
            LatestGrouping::Source => Self::Source,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ladderboard", version)]
#[command(about = "Leaderboard and raw-data reports for a tree of benchmark results.csv files")]
struct Args {
    /// Directory containing the results tree
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// JSON file with layout and column settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column holding the per-row success value
    #[arg(long)]
    success_column: Option<String>,

    /// Views to render
    #[arg(long, value_enum, default_value_t = ViewMode::Both)]
    view: ViewMode,

    /// Rank agents on their latest run only
    #[arg(long)]
    latest: bool,

    /// Grouping that decides which run is the latest
    #[arg(long, value_enum, default_value_t = LatestGrouping::AgentLadder)]
    latest_by: LatestGrouping,

    /// Ladders shown in the raw view (comma-separated, default all). The
    /// token `all` always selects every ladder, so a ladder literally named
    /// `all` cannot be picked on its own
    #[arg(long)]
    ladders: Option<String>,

    /// Agents shown in the raw view (comma-separated, default all). The
    /// token `all` always selects every agent, so an agent literally named
    /// `all` cannot be picked on its own
    #[arg(long)]
    agents: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "markdown", "json", "csv", "html"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List the ladders and agents found under the base directory and exit
    #[arg(long)]
    list_filters: bool,

    /// Exit with status 2 when any results file failed to load
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    let dashboard = Dashboard::new(args.base_dir.clone(), config);

    if maybe_list_filters(&args, &dashboard)? {
        return Ok(());
    }

    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let view = dashboard.handle(&build_request(&args));
    write_reports(&args, &view)?;

    if args.strict && !view.load_failures.is_empty() {
        eprintln!(
            "❌ {} results file(s) failed to load",
            view.load_failures.len().to_string().red()
        );
        std::process::exit(2);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(column) = &args.success_column {
        config = config.with_success_column(column.clone());
    }
    Ok(config)
}

fn build_request(args: &Args) -> ViewRequest {
    let mut filter = RawFilter::all();
    if let Some(ladders) = selection(args.ladders.as_deref()) {
        filter = filter.with_ladders(ladders);
    }
    if let Some(agents) = selection(args.agents.as_deref()) {
        filter = filter.with_agents(agents);
    }
    ViewRequest {
        latest_only: args.latest,
        latest_by: args.latest_by.into(),
        filter,
    }
}

fn maybe_list_filters(args: &Args, dashboard: &Dashboard) -> Result<bool> {
    if !args.list_filters {
        return Ok(false);
    }
    let report = dashboard.load();
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Ladders:")?;
    for ladder in report.table.ladders() {
        writeln!(output_target.writer(), "  {ladder}")?;
    }
    writeln!(output_target.writer(), "Agents:")?;
    for agent in report.table.agents() {
        writeln!(output_target.writer(), "  {agent}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🪜 Ladderboard".bright_cyan().bold());
    println!("{}", "==============".cyan());
}

fn write_reports(args: &Args, view: &DashboardView) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.output.is_some() {
        colored::control::set_override(false);
    }

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, view, args.view)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, view, args.view)?,
        "html" => reports::generate_html_report(&mut output_target, view, args.view)?,
        "csv" => {
            if let Some(warning) =
                reports::generate_csv_report(&mut output_target, view, args.view)?
            {
                eprintln!("⚠️  {}", warning.yellow());
            }
        }
        _ => reports::generate_console_report(&mut output_target, view, args.view)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
