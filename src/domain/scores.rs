use serde::{Deserialize, Serialize};
use std::fmt;

use super::models::Side;
use crate::errors::{LeagueError, LeagueResult};

pub const MIN_SETS: usize = 2;
pub const MAX_SETS: usize = 3;

/// Games won in one set, oriented as player1/player2 of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub player1_games: u8,
    pub player2_games: u8,
}

impl SetScore {
    pub fn new(player1_games: u8, player2_games: u8) -> Self {
        Self {
            player1_games,
            player2_games,
        }
    }

    fn winner(&self) -> Option<Side> {
        if self.player1_games > self.player2_games {
            Some(Side::Player1)
        } else if self.player2_games > self.player1_games {
            Some(Side::Player2)
        } else {
            None
        }
    }
}

/// A full match score of two or three sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetScores(Vec<SetScore>);

impl SetScores {
    pub fn new(sets: Vec<SetScore>) -> Self {
        Self(sets)
    }

    pub fn from_pairs(pairs: &[(u8, u8)]) -> Self {
        Self(pairs.iter().map(|&(a, b)| SetScore::new(a, b)).collect())
    }

    pub fn sets(&self) -> &[SetScore] {
        &self.0
    }

    /// Checks the score is a complete best-of-three result and returns the
    /// side that won the majority of sets.
    pub fn winner(&self) -> LeagueResult<Side> {
        let sets = &self.0;
        if sets.len() < MIN_SETS {
            return Err(invalid(format!("at least {} sets are required", MIN_SETS)));
        }
        if sets.len() > MAX_SETS {
            return Err(invalid(format!("at most {} sets can be played", MAX_SETS)));
        }

        let mut won = [0usize; 2];
        for (idx, set) in sets.iter().enumerate() {
            let side = set
                .winner()
                .ok_or_else(|| invalid(format!("set {} is tied", idx + 1)))?;

            if won.contains(&2) {
                return Err(invalid(format!(
                    "set {} was played after the match was decided",
                    idx + 1
                )));
            }
            won[side_index(side)] += 1;
        }

        match won {
            [2, _] => Ok(Side::Player1),
            [_, 2] => Ok(Side::Player2),
            _ => Err(invalid("no player won a majority of sets".to_string())),
        }
    }

    /// Column values for the three canonical set slots of a match row
    pub fn to_columns(&self) -> [(Option<u8>, Option<u8>); MAX_SETS] {
        let mut columns = [(None, None); MAX_SETS];
        for (slot, set) in columns.iter_mut().zip(self.0.iter()) {
            *slot = (Some(set.player1_games), Some(set.player2_games));
        }
        columns
    }

    /// Rebuilds a score from stored columns, stopping at the first empty slot
    pub fn from_columns(columns: &[(Option<u8>, Option<u8>)]) -> Option<Self> {
        let sets: Vec<SetScore> = columns
            .iter()
            .map_while(|&(a, b)| Some(SetScore::new(a?, b?)))
            .collect();

        if sets.is_empty() { None } else { Some(Self(sets)) }
    }
}

impl fmt::Display for SetScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|s| format!("{}:{}", s.player1_games, s.player2_games))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Player1 => 0,
        Side::Player2 => 1,
    }
}

fn invalid(reason: String) -> LeagueError {
    LeagueError::InvalidScore(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_set_win_for_player1() {
        let score = SetScores::from_pairs(&[(6, 3), (4, 6), (6, 2)]);
        assert_eq!(score.winner().unwrap(), Side::Player1);
    }

    #[test]
    fn test_straight_sets_win_for_player2() {
        let score = SetScores::from_pairs(&[(3, 6), (5, 7)]);
        assert_eq!(score.winner().unwrap(), Side::Player2);
    }

    #[test]
    fn test_tied_set_is_rejected() {
        let score = SetScores::from_pairs(&[(6, 6), (6, 3)]);
        assert!(matches!(score.winner(), Err(LeagueError::InvalidScore(_))));
    }

    #[test]
    fn test_single_set_is_rejected() {
        let score = SetScores::from_pairs(&[(6, 0)]);
        assert!(matches!(score.winner(), Err(LeagueError::InvalidScore(_))));
    }

    #[test]
    fn test_split_sets_without_decider_is_rejected() {
        let score = SetScores::from_pairs(&[(6, 3), (3, 6)]);
        assert!(matches!(score.winner(), Err(LeagueError::InvalidScore(_))));
    }

    #[test]
    fn test_third_set_after_decided_match_is_rejected() {
        let score = SetScores::from_pairs(&[(6, 3), (6, 4), (6, 1)]);
        assert!(matches!(score.winner(), Err(LeagueError::InvalidScore(_))));
    }

    #[test]
    fn test_columns_keep_set_order() {
        let score = SetScores::from_pairs(&[(7, 5), (6, 4)]);
        let columns = score.to_columns();
        assert_eq!(columns[0], (Some(7), Some(5)));
        assert_eq!(columns[2], (None, None));
        assert_eq!(SetScores::from_columns(&columns), Some(score));
    }

    #[test]
    fn test_display_score_line() {
        let score = SetScores::from_pairs(&[(6, 3), (4, 6), (6, 2)]);
        assert_eq!(score.to_string(), "6:3 4:6 6:2");
    }
}
