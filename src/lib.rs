//! Splits a player roster into size-balanced, engagement-balanced teams.
//!
//! The roster is scored, ordered by score with seeded tie-breaks, drafted
//! snake style under a team size cap, and summarised per team.

pub mod display;
pub mod draft;
pub mod error;
pub mod logger;
pub mod parser;
pub mod report;
pub mod scoring;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

use draft::{
    assign_teams, build_team_summaries, sort_for_draft, verify_assignment, DraftDirection, SeededRng,
    TeamSortResult,
};
use error::{ConfigError, SortError};
use parser::{load_players, Player};

pub const DEFAULT_INPUT: &str = "data/level_a_players.csv";

/// Upper bound on the team count. Per-team state is allocated up front.
pub const MAX_TEAMS: usize = 10_000;

/// Checks that `num_teams` lies in `2..=MAX_TEAMS`.
pub fn check_team_count(num_teams: usize) -> Result<usize, ConfigError> {
    if num_teams < 2 {
        return Err(ConfigError::TooFewTeams(num_teams));
    }
    if num_teams > MAX_TEAMS {
        return Err(ConfigError::TooManyTeams(num_teams));
    }
    Ok(num_teams)
}

/// Settings for one sorting run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub input: PathBuf,
    pub num_teams: usize,
    pub seed: Option<i64>,
}

impl SortConfig {
    pub fn new(input: impl Into<PathBuf>, num_teams: usize, seed: Option<i64>) -> Self {
        SortConfig {
            input: input.into(),
            num_teams,
            seed,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_team_count(self.num_teams)?;
        Ok(())
    }
}

/// Parses a team count given as text.
pub fn parse_team_count(text: &str) -> Result<usize, ConfigError> {
    let count: usize = text
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTeamCount(text.to_string()))?;
    check_team_count(count)
}

/// Parses a seed given as text.
pub fn parse_seed(text: &str) -> Result<i64, ConfigError> {
    text.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeed(text.to_string()))
}

/// Orders, drafts, checks and summarises an already loaded roster.
///
/// `now` is the reference time for the inactivity check.
pub fn sort_roster(
    mut players: Vec<Player>,
    num_teams: usize,
    seed: Option<i64>,
    now: NaiveDateTime,
) -> Result<TeamSortResult, SortError> {
    check_team_count(num_teams)?;

    let mut rng = SeededRng::from_seed(seed);
    sort_for_draft(&mut players, &mut rng);

    let direction = DraftDirection::from_seed(seed);
    let mapping = assign_teams(&players, num_teams, direction, now)?;
    verify_assignment(&players, &mapping, num_teams)?;

    let teams = build_team_summaries(&players, &mapping, num_teams);
    Ok(TeamSortResult { mapping, teams })
}

/// Loads the roster named by `config` and sorts it into teams.
///
/// The configuration is validated before the input file is touched.
pub fn sort_players(config: &SortConfig, now: NaiveDateTime) -> Result<TeamSortResult, SortError> {
    config.validate()?;
    info!(
        input = %config.input.display(),
        num_teams = config.num_teams,
        seed = ?config.seed,
        "sorting players"
    );

    let players = load_players(&config.input)?;
    sort_roster(players, config.num_teams, config.seed, now)
}
