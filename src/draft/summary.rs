use crate::parser::Player;

use super::types::{TeamAssignment, TeamSummary};

/// Groups players into one summary per team id `1..=num_teams`.
///
/// Teams that received nobody still get a summary with size 0 and average 0.
/// Players missing from `assignment` are left out.
pub fn build_team_summaries(
    players: &[Player],
    assignment: &TeamAssignment,
    num_teams: usize,
) -> Vec<TeamSummary> {
    let mut teams: Vec<TeamSummary> = (1..=num_teams)
        .map(|id| TeamSummary {
            id,
            size: 0,
            total_engagement: 0,
            avg_engagement: 0.0,
            players: Vec::new(),
        })
        .collect();

    for player in players {
        let Some(team_id) = assignment.team_of(player.id) else {
            continue;
        };
        if let Some(team) = team_id.checked_sub(1).and_then(|index| teams.get_mut(index)) {
            team.size += 1;
            team.total_engagement += player.engagement_score;
            team.players.push(player.clone());
        }
    }

    for team in &mut teams {
        if team.size > 0 {
            team.avg_engagement = team.total_engagement as f64 / team.size as f64;
        }
    }

    teams
}
