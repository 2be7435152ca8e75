use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roster_assignment::config::{OutputFormat, RunConfig, Shift, DEFAULT_PORT, DEFAULT_SLOT_MINUTES};
use roster_assignment::display::{render_allocation, render_match, write_report};
use roster_assignment::export::{allocation_csv_string, match_csv_string};
use roster_assignment::parser::{load_panel, load_requests, load_roster};
use roster_assignment::schedule::{allocate_shift, CategoryTable, WindowMatcher};
use roster_assignment::web;

#[derive(Parser)]
#[command(name = "roster-assignment", version, about = "Assign interview slots to interviewers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spread a shift's slots over the roster in proportion to capacity
    Allocate(AllocateArgs),
    /// Assign timestamped requests to interviewers by availability window
    Match(MatchArgs),
    /// Serve both allocators over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct AllocateArgs {
    /// Roster CSV (Interviewer_ID, Name, Email, Day_Available, Night_Available, Day_Slots, Night_Slots)
    #[arg(long)]
    roster: PathBuf,
    #[arg(long, value_enum, env = "ROSTER_SHIFT", default_value_t = Shift::Day)]
    shift: Shift,
    /// Slots to distribute; defaults to the number of slots in the shift
    #[arg(long)]
    slots: Option<u32>,
    /// Length of one slot in minutes
    #[arg(long, env = "ROSTER_SLOT_MINUTES", default_value_t = DEFAULT_SLOT_MINUTES)]
    slot_minutes: u32,
    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args)]
struct MatchArgs {
    /// Panel CSV (Name, Categories, Availability)
    #[arg(long)]
    panel: PathBuf,
    /// Request CSV (Email, Start, Category)
    #[arg(long)]
    requests: PathBuf,
    /// Length of one interview in minutes
    #[arg(long, env = "ROSTER_SLOT_MINUTES", default_value_t = DEFAULT_SLOT_MINUTES)]
    slot_minutes: u32,
    /// Extra request category mapping, REQUEST=FLAG (repeatable)
    #[arg(long = "category", value_name = "REQUEST=FLAG")]
    categories: Vec<String>,
    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, env = "ROSTER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Extra request category mapping, REQUEST=FLAG (repeatable)
    #[arg(long = "category", value_name = "REQUEST=FLAG")]
    categories: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn category_table(specs: &[String]) -> Result<CategoryTable> {
    let mut table = CategoryTable::default();
    for spec in specs {
        table.insert_spec(spec)?;
    }
    Ok(table)
}

fn run_allocate(args: AllocateArgs) -> Result<()> {
    let config = RunConfig {
        shift: args.shift,
        slots: args.slots,
        slot_minutes: args.slot_minutes,
        format: args.report.format,
        output: args.report.output,
    };
    config.validate()?;

    let roster = load_roster(&args.roster)
        .with_context(|| format!("failed to load roster {}", args.roster.display()))?;

    let total_slots = config.total_slots();
    info!(shift = %config.shift, total_slots, "allocating slots");
    let allocation = allocate_shift(&roster, config.shift, total_slots);

    let report = match config.format {
        OutputFormat::Text => render_allocation(config.shift, config.slot_minutes, &allocation),
        OutputFormat::Csv => allocation_csv_string(&allocation)?,
    };
    write_report(&report, config.output.as_deref()).context("failed to write report")?;

    if !allocation.is_satisfied() {
        warn!(
            requested = allocation.requested,
            assigned = allocation.assigned,
            shortfall = allocation.shortfall,
            "not every requested slot could be assigned"
        );
    }
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<()> {
    let config = RunConfig {
        slot_minutes: args.slot_minutes,
        format: args.report.format,
        output: args.report.output,
        ..RunConfig::default()
    };
    config.validate()?;
    let categories = category_table(&args.categories)?;

    let panel = load_panel(&args.panel)
        .with_context(|| format!("failed to load panel {}", args.panel.display()))?;
    let requests = load_requests(&args.requests)
        .with_context(|| format!("failed to load requests {}", args.requests.display()))?;

    info!(interviewers = panel.len(), requests = requests.len(), "matching requests");
    let matcher = WindowMatcher::new(&categories, config.slot_minutes);
    let outcome = matcher.match_requests(&panel, &requests);

    let report = match config.format {
        OutputFormat::Text => render_match(matcher.slot_minutes(), &outcome),
        OutputFormat::Csv => match_csv_string(matcher.slot_minutes(), &outcome)?,
    };
    write_report(&report, config.output.as_deref()).context("failed to write report")?;

    if let Some(path) = &config.output {
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Allocate(args) => run_allocate(args),
        Command::Match(args) => run_match(args),
        Command::Serve(args) => {
            let categories = category_table(&args.categories)?;
            web::start_server(args.port, categories)
                .await
                .context("web server failed")
        }
    }
}
