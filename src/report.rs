use serde::Serialize;

use crate::draft::{TeamId, TeamSummary};
use crate::parser::PlayerId;

/// Largest max-minus-min team size graded EXCELLENT / GOOD.
pub const EXCELLENT_SIZE_VARIANCE: usize = 1;
pub const GOOD_SIZE_VARIANCE: usize = 2;

/// Engagement deviation from the mean (percent, exclusive) graded
/// EXCELLENT / GOOD. The same cut-offs apply to per-team marks, the
/// engagement grade and the overall verdict.
pub const EXCELLENT_DEVIATION_PCT: f64 = 10.0;
pub const GOOD_DEVIATION_PCT: f64 = 20.0;

pub const TOP_PLAYERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    Excellent,
    Good,
    Poor,
}

impl Grade {
    pub fn for_size_variance(variance: usize) -> Self {
        if variance <= EXCELLENT_SIZE_VARIANCE {
            Grade::Excellent
        } else if variance <= GOOD_SIZE_VARIANCE {
            Grade::Good
        } else {
            Grade::Poor
        }
    }

    pub fn for_deviation(percent: f64) -> Self {
        let percent = percent.abs();
        if percent < EXCELLENT_DEVIATION_PCT {
            Grade::Excellent
        } else if percent < GOOD_DEVIATION_PCT {
            Grade::Good
        } else {
            Grade::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "EXCELLENT",
            Grade::Good => "GOOD",
            Grade::Poor => "POOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fairness {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Fairness {
    pub fn assess(size_variance: usize, max_deviation_pct: f64) -> Self {
        if size_variance <= EXCELLENT_SIZE_VARIANCE && max_deviation_pct < EXCELLENT_DEVIATION_PCT {
            Fairness::Excellent
        } else if size_variance <= GOOD_SIZE_VARIANCE && max_deviation_pct < GOOD_DEVIATION_PCT {
            Fairness::Good
        } else {
            Fairness::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Fairness::Excellent => "EXCELLENT",
            Fairness::Good => "GOOD",
            Fairness::NeedsImprovement => "NEEDS IMPROVEMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl ScoreRange {
    fn of(scores: impl IntoIterator<Item = i64>) -> Option<Self> {
        scores.into_iter().fold(None, |range, score| match range {
            None => Some(ScoreRange { min: score, max: score }),
            Some(ScoreRange { min, max }) => Some(ScoreRange {
                min: min.min(score),
                max: max.max(score),
            }),
        })
    }

    pub fn span(&self) -> i64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamBalance {
    pub id: TeamId,
    pub size: usize,
    /// Size minus the average team size
    pub size_deviation: f64,
    pub avg_engagement: f64,
    /// Average engagement relative to the mean of all team averages
    pub deviation_pct: f64,
    pub grade: Grade,
    pub top_players: Vec<(PlayerId, i64)>,
    pub score_range: Option<ScoreRange>,
}

/// Fairness diagnostics computed from team summaries.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub teams: Vec<TeamBalance>,
    pub total_players: usize,
    pub avg_team_size: f64,
    pub mean_engagement: f64,
    pub size_variance: usize,
    pub engagement_spread: f64,
    pub engagement_spread_pct: f64,
    pub engagement_std_dev: f64,
    pub max_deviation: f64,
    pub max_deviation_pct: f64,
    pub size_grade: Grade,
    pub engagement_grade: Grade,
    pub overall: Fairness,
    pub score_range: Option<ScoreRange>,
}

/// Percentage of `value` against `mean`; 0 when the mean is 0.
fn percent_of(value: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        0.0
    } else {
        value / mean * 100.0
    }
}

impl BalanceReport {
    pub fn from_teams(teams: &[TeamSummary]) -> Self {
        let team_count = teams.len().max(1) as f64;
        let total_players: usize = teams.iter().map(|t| t.size).sum();
        let avg_team_size = total_players as f64 / team_count;
        let mean_engagement = teams.iter().map(|t| t.avg_engagement).sum::<f64>() / team_count;

        let max_size = teams.iter().map(|t| t.size).max().unwrap_or(0);
        let min_size = teams.iter().map(|t| t.size).min().unwrap_or(0);
        let size_variance = max_size - min_size;

        let max_avg = teams.iter().map(|t| t.avg_engagement).fold(f64::NEG_INFINITY, f64::max);
        let min_avg = teams.iter().map(|t| t.avg_engagement).fold(f64::INFINITY, f64::min);
        let engagement_spread = if teams.is_empty() { 0.0 } else { max_avg - min_avg };

        let engagement_std_dev = (teams
            .iter()
            .map(|t| (t.avg_engagement - mean_engagement).powi(2))
            .sum::<f64>()
            / team_count)
            .sqrt();

        let balances: Vec<TeamBalance> = teams
            .iter()
            .map(|team| {
                let deviation_pct = percent_of(team.avg_engagement - mean_engagement, mean_engagement);

                let mut ranked: Vec<(PlayerId, i64)> =
                    team.players.iter().map(|p| (p.id, p.engagement_score)).collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                ranked.truncate(TOP_PLAYERS);

                TeamBalance {
                    id: team.id,
                    size: team.size,
                    size_deviation: team.size as f64 - avg_team_size,
                    avg_engagement: team.avg_engagement,
                    deviation_pct,
                    grade: Grade::for_deviation(deviation_pct),
                    top_players: ranked,
                    score_range: ScoreRange::of(team.players.iter().map(|p| p.engagement_score)),
                }
            })
            .collect();

        let max_deviation = teams
            .iter()
            .map(|t| (t.avg_engagement - mean_engagement).abs())
            .fold(0.0, f64::max);
        let max_deviation_pct = balances.iter().map(|b| b.deviation_pct.abs()).fold(0.0, f64::max);

        let score_range = ScoreRange::of(
            teams
                .iter()
                .flat_map(|t| t.players.iter().map(|p| p.engagement_score)),
        );

        BalanceReport {
            teams: balances,
            total_players,
            avg_team_size,
            mean_engagement,
            size_variance,
            engagement_spread,
            engagement_spread_pct: percent_of(engagement_spread, mean_engagement),
            engagement_std_dev,
            max_deviation,
            max_deviation_pct,
            size_grade: Grade::for_size_variance(size_variance),
            engagement_grade: Grade::for_deviation(max_deviation_pct),
            overall: Fairness::assess(size_variance, max_deviation_pct),
            score_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::test_support::player_with_score;

    fn team(id: TeamId, scores: &[i64]) -> TeamSummary {
        let players: Vec<_> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| player_with_score((id * 100 + i) as u64, score))
            .collect();
        let total: i64 = scores.iter().sum();
        TeamSummary {
            id,
            size: scores.len(),
            total_engagement: total,
            avg_engagement: if scores.is_empty() { 0.0 } else { total as f64 / scores.len() as f64 },
            players,
        }
    }

    #[test]
    fn perfectly_even_teams_are_excellent() {
        let report = BalanceReport::from_teams(&[team(1, &[10, 20]), team(2, &[15, 15])]);

        assert_eq!(report.total_players, 4);
        assert_eq!(report.size_variance, 0);
        assert_eq!(report.mean_engagement, 15.0);
        assert_eq!(report.max_deviation_pct, 0.0);
        assert_eq!(report.engagement_std_dev, 0.0);
        assert_eq!(report.overall, Fairness::Excellent);
        assert_eq!(report.score_range, Some(ScoreRange { min: 10, max: 20 }));
    }

    #[test]
    fn deviation_thresholds() {
        // Averages 90 and 110 around a mean of 100: 10% off, not below 10.
        let report = BalanceReport::from_teams(&[team(1, &[90]), team(2, &[110])]);
        assert_eq!(report.max_deviation_pct, 10.0);
        assert_eq!(report.engagement_grade, Grade::Good);
        assert_eq!(report.overall, Fairness::Good);

        let report = BalanceReport::from_teams(&[team(1, &[50]), team(2, &[150])]);
        assert_eq!(report.max_deviation_pct, 50.0);
        assert_eq!(report.engagement_grade, Grade::Poor);
        assert_eq!(report.overall, Fairness::NeedsImprovement);
    }

    #[test]
    fn size_variance_grades() {
        assert_eq!(Grade::for_size_variance(0), Grade::Excellent);
        assert_eq!(Grade::for_size_variance(1), Grade::Excellent);
        assert_eq!(Grade::for_size_variance(2), Grade::Good);
        assert_eq!(Grade::for_size_variance(3), Grade::Poor);

        assert_eq!(Fairness::assess(2, 5.0), Fairness::Good);
        assert_eq!(Fairness::assess(3, 0.0), Fairness::NeedsImprovement);
    }

    #[test]
    fn top_players_are_best_three() {
        let report = BalanceReport::from_teams(&[team(1, &[5, 50, 20, 40]), team(2, &[1])]);
        let scores: Vec<i64> = report.teams[0].top_players.iter().map(|(_, s)| *s).collect();
        assert_eq!(scores, vec![50, 40, 20]);
        assert_eq!(report.teams[1].top_players.len(), 1);
    }

    #[test]
    fn zero_engagement_does_not_divide_by_zero() {
        let report = BalanceReport::from_teams(&[team(1, &[]), team(2, &[])]);
        assert_eq!(report.mean_engagement, 0.0);
        assert_eq!(report.max_deviation_pct, 0.0);
        assert_eq!(report.engagement_spread_pct, 0.0);
        assert_eq!(report.score_range, None);
        assert_eq!(report.teams[0].score_range, None);
        assert_eq!(report.overall, Fairness::Excellent);
    }

    #[test]
    fn size_deviation_against_average() {
        let report = BalanceReport::from_teams(&[team(1, &[1, 1]), team(2, &[1])]);
        assert_eq!(report.avg_team_size, 1.5);
        assert_eq!(report.teams[0].size_deviation, 0.5);
        assert_eq!(report.teams[1].size_deviation, -0.5);
        assert_eq!(report.size_variance, 1);
    }
}
