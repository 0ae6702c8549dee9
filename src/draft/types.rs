use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::parser::{Player, PlayerId};

/// 1-based team number as shown to users.
pub type TeamId = usize;

/// Which way round 0 of the snake runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftDirection {
    Forward,
    Backward,
}

impl DraftDirection {
    /// Even seeds start forward, odd seeds start backward. No seed starts
    /// forward.
    pub fn from_seed(seed: Option<i64>) -> Self {
        match seed {
            Some(seed) if seed.rem_euclid(2) != 0 => DraftDirection::Backward,
            _ => DraftDirection::Forward,
        }
    }

    pub fn starts_forward(self) -> bool {
        self == DraftDirection::Forward
    }
}

/// Player to team mapping, kept in the order players were drafted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamAssignment {
    #[serde(rename = "assignments")]
    placements: Vec<(PlayerId, TeamId)>,
    #[serde(skip)]
    index: HashMap<PlayerId, TeamId>,
}

impl TeamAssignment {
    pub fn with_capacity(capacity: usize) -> Self {
        TeamAssignment {
            placements: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Records a placement. Returns false if the player was already placed;
    /// the earlier placement is kept.
    pub fn assign(&mut self, player: PlayerId, team: TeamId) -> bool {
        if self.index.contains_key(&player) {
            return false;
        }
        self.index.insert(player, team);
        self.placements.push((player, team));
        true
    }

    pub fn team_of(&self, player: PlayerId) -> Option<TeamId> {
        self.index.get(&player).copied()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in draft order
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, TeamId)> + '_ {
        self.placements.iter().copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub size: usize,
    pub total_engagement: i64,
    pub avg_engagement: f64,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSortResult {
    pub mapping: TeamAssignment,
    pub teams: Vec<TeamSummary>,
}
