use serde::Serialize;

use crate::domain::{MatchId, Points, TournamentId, UserId};

/// The facts of an agreed match that the rating engine needs
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome {
    pub match_id: MatchId,
    pub tournament_id: TournamentId,
    pub winner_id: UserId,
    pub loser_id: UserId,
}

/// Counters of one player before a match is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub user_id: UserId,
    pub points: Points,
    pub matches_played: i32,
    pub matches_won: i32,
}

/// Result of applying a match to one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingChange {
    pub user_id: UserId,
    pub points_before: Points,
    pub points_after: Points,
    pub matches_played: i32,
    pub matches_won: i32,
    pub won: bool,
}

impl RatingChange {
    /// Signed delta actually applied, after the floor
    pub fn delta(&self) -> Points {
        self.points_after - self.points_before
    }
}
