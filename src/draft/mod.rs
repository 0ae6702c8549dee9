pub mod types;
pub mod rng;
pub mod order;
pub mod snake;
pub mod summary;

pub use types::{DraftDirection, TeamAssignment, TeamId, TeamSortResult, TeamSummary};
pub use rng::SeededRng;
pub use order::sort_for_draft;
pub use snake::{assign_teams, is_less_active, verify_assignment};
pub use summary::build_team_summaries;
