use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, info, warn};

use crate::check_team_count;
use crate::error::SortError;
use crate::parser::Player;

use super::types::{DraftDirection, TeamAssignment};

/// Players inactive for longer than this are treated as less active when a
/// team overflows.
pub const INACTIVITY_DAYS: i64 = 30;

/// True when `last_active` is strictly older than `now` minus the
/// inactivity window.
pub fn is_less_active(last_active: NaiveDateTime, now: NaiveDateTime) -> bool {
    last_active < now - TimeDelta::days(INACTIVITY_DAYS)
}

/// Snake position of the `index`-th pick: the 0-based team index and
/// whether this round runs forward.
pub fn snake_slot(index: usize, num_teams: usize, direction: DraftDirection) -> (usize, bool) {
    let round = index / num_teams;
    let position = index % num_teams;
    let go_forward = direction.starts_forward() == (round % 2 == 0);

    if go_forward {
        (position, true)
    } else {
        (num_teams - 1 - position, false)
    }
}

/// Running state of one draft: per-team size and engagement total.
#[derive(Debug, Clone)]
pub struct Draft {
    sizes: Vec<usize>,
    totals: Vec<i64>,
    max_size: usize,
    direction: DraftDirection,
    now: NaiveDateTime,
}

impl Draft {
    pub fn new(num_teams: usize, total_players: usize, direction: DraftDirection, now: NaiveDateTime) -> Self {
        Draft {
            sizes: vec![0; num_teams],
            totals: vec![0; num_teams],
            max_size: total_players / num_teams + 1,
            direction,
            now,
        }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn totals(&self) -> &[i64] {
        &self.totals
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Places the `index`-th player of the draft order and returns the
    /// 0-based team index it went to.
    pub fn place(&mut self, index: usize, player: &Player) -> usize {
        let (candidate, _) = snake_slot(index, self.sizes.len(), self.direction);

        let team = if self.sizes[candidate] >= self.max_size {
            let chosen = self.overflow_team(index, player);
            debug!(
                player = player.id,
                candidate = candidate + 1,
                chosen = chosen + 1,
                "snake slot full, rerouted"
            );
            chosen
        } else {
            candidate
        };

        self.sizes[team] += 1;
        self.totals[team] += player.engagement_score;
        team
    }

    /// Picks a team for a player whose snake slot is already full.
    fn overflow_team(&self, index: usize, player: &Player) -> usize {
        let available: Vec<usize> = (0..self.sizes.len())
            .filter(|&team| self.sizes[team] < self.max_size)
            .collect();

        match available.as_slice() {
            [] => smallest_team(&self.sizes),
            [only] => *only,
            _ if is_less_active(player.last_active, self.now) => largest_team(&self.sizes, &available),
            _ => {
                let (candidate, go_forward) = snake_slot(index, self.sizes.len(), self.direction);
                if available.contains(&candidate) {
                    return candidate;
                }
                let num_teams = self.sizes.len();
                (0..num_teams)
                    .map(|step| if go_forward { step } else { num_teams - 1 - step })
                    .find(|team| available.contains(team))
                    .unwrap_or(available[0])
            }
        }
    }
}

/// Smallest team overall, lowest index on ties.
fn smallest_team(sizes: &[usize]) -> usize {
    let mut best = 0;
    for (team, &size) in sizes.iter().enumerate().skip(1) {
        if size < sizes[best] {
            best = team;
        }
    }
    best
}

/// Largest team among `available`, lowest index on ties. `available` is
/// ascending and non-empty.
fn largest_team(sizes: &[usize], available: &[usize]) -> usize {
    let mut best = available[0];
    for &team in &available[1..] {
        if sizes[team] > sizes[best] {
            best = team;
        }
    }
    best
}

/// Runs the size-capped snake draft over players already in draft order.
pub fn assign_teams(
    players: &[Player],
    num_teams: usize,
    direction: DraftDirection,
    now: NaiveDateTime,
) -> Result<TeamAssignment, SortError> {
    check_team_count(num_teams)?;
    if players.is_empty() {
        warn!(num_teams, "no players to draft");
    }

    let mut draft = Draft::new(num_teams, players.len(), direction, now);
    let mut assignment = TeamAssignment::with_capacity(players.len());

    for (index, player) in players.iter().enumerate() {
        let team = draft.place(index, player);
        if !assignment.assign(player.id, team + 1) {
            return Err(SortError::Invariant(format!("player {} drafted twice", player.id)));
        }
    }

    info!(
        players = players.len(),
        num_teams,
        max_size = draft.max_size(),
        ?direction,
        sizes = ?draft.sizes(),
        "draft complete"
    );
    Ok(assignment)
}

/// Checks that `assignment` covers every player once, uses only valid team
/// ids, and keeps team sizes within one of each other.
pub fn verify_assignment(
    players: &[Player],
    assignment: &TeamAssignment,
    num_teams: usize,
) -> Result<(), SortError> {
    if assignment.len() != players.len() {
        return Err(SortError::Invariant(format!(
            "{} placements for {} players",
            assignment.len(),
            players.len()
        )));
    }

    let mut sizes = vec![0usize; num_teams];
    for player in players {
        match assignment.team_of(player.id) {
            Some(team) if (1..=num_teams).contains(&team) => sizes[team - 1] += 1,
            Some(team) => {
                return Err(SortError::Invariant(format!(
                    "player {} placed on team {team} outside 1..={num_teams}",
                    player.id
                )))
            }
            None => return Err(SortError::Invariant(format!("player {} left unassigned", player.id))),
        }
    }

    let base = players.len() / num_teams;
    let max_size = base + 1;
    if let Some((team, size)) = sizes
        .iter()
        .enumerate()
        .find(|(_, size)| **size < base || **size > max_size)
    {
        return Err(SortError::Invariant(format!(
            "team {} has {size} players, expected {base} or {max_size}",
            team + 1
        )));
    }

    Ok(())
}
