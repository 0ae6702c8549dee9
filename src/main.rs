use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use team_sorter::display::{render_assignments, render_balance_report, render_team_summary};
use team_sorter::logger::init_logger;
use team_sorter::report::BalanceReport;
use team_sorter::{parse_seed, parse_team_count, sort_players, SortConfig, DEFAULT_INPUT};

#[derive(Parser)]
#[command(name = "team-sorter")]
#[command(about = "Sort a player roster into balanced teams", long_about = None)]
struct Cli {
    /// Number of teams to create (at least 2)
    #[arg(short, long, value_parser = parse_team_count)]
    teams: usize,

    /// Random seed for reproducible results
    #[arg(short, long, value_parser = parse_seed, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Path to the roster CSV file
    #[arg(short, long, env = "TEAM_SORTER_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Include per-team score ranges in the balance analysis
    #[arg(short, long)]
    detailed: bool,

    /// Print the assignment and analysis as JSON
    #[arg(long)]
    json: bool,

    /// Increase log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    let config = SortConfig::new(cli.input, cli.teams, cli.seed);
    let now = Local::now().naive_local();

    let result = sort_players(&config, now)
        .with_context(|| format!("failed to sort players from {}", config.input.display()))?;
    let report = BalanceReport::from_teams(&result.teams);
    info!(overall = report.overall.label(), "analysis complete");

    if cli.json {
        let payload = serde_json::json!({
            "mapping": &result.mapping,
            "teams": &result.teams,
            "report": &report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print!("{}", render_assignments(&result)?);
    print!("{}", render_team_summary(&result, &report)?);
    print!("{}", render_balance_report(&report, cli.detailed)?);

    Ok(())
}
