use serde::{Deserialize, Serialize};

/// Raw activity numbers read from one roster row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub current_total_points: f64,
    pub days_active_last_30: f64,
    pub current_streak_value: f64,
    pub historical_points_earned: f64,
    pub historical_points_spent: f64,
    pub historical_events_participated: f64,
    pub historical_event_engagements: f64,
    pub historical_messages_sent: f64,
}

/// Multipliers applied to each activity attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementWeights {
    pub current_total_points: f64,
    pub days_active_last_30: f64,
    pub current_streak_value: f64,
    pub historical_points_earned: f64,
    pub historical_points_spent: f64,
    pub historical_events_participated: f64,
    pub historical_event_engagements: f64,
    pub historical_messages_sent: f64,
}

pub const DEFAULT_WEIGHTS: EngagementWeights = EngagementWeights {
    current_total_points: 4.0,
    days_active_last_30: 20.0,
    current_streak_value: 10.0,
    historical_points_earned: 3.0,
    historical_points_spent: 2.0,
    historical_events_participated: 10.0,
    historical_event_engagements: 5.0,
    historical_messages_sent: 2.0,
};

impl EngagementWeights {
    /// Weighted sum of `stats`, rounded half away from zero.
    pub fn score(&self, stats: &ActivityStats) -> i64 {
        let sum = stats.current_total_points * self.current_total_points
            + stats.days_active_last_30 * self.days_active_last_30
            + stats.current_streak_value * self.current_streak_value
            + stats.historical_points_earned * self.historical_points_earned
            + stats.historical_points_spent * self.historical_points_spent
            + stats.historical_events_participated * self.historical_events_participated
            + stats.historical_event_engagements * self.historical_event_engagements
            + stats.historical_messages_sent * self.historical_messages_sent;

        sum.round() as i64
    }
}

/// Scores `stats` with the default weight table.
pub fn engagement_score(stats: &ActivityStats) -> i64 {
    DEFAULT_WEIGHTS.score(stats)
}
