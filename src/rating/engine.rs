use log::info;

use super::types::{RatingChange, Standing};
use crate::config::settings::RatingSettings;
use crate::domain::MatchId;

/// Applies the fixed win/loss deltas to both players of one match.
///
/// The winner gains `win_delta`; the loser gains `loss_delta` (negative) but
/// never drops below `points_floor`.
pub fn score_match(
    winner: &Standing,
    loser: &Standing,
    settings: &RatingSettings,
) -> (RatingChange, RatingChange) {
    let winner_change = RatingChange {
        user_id: winner.user_id,
        points_before: winner.points,
        points_after: winner.points + settings.win_delta,
        matches_played: winner.matches_played + 1,
        matches_won: winner.matches_won + 1,
        won: true,
    };

    let loser_change = RatingChange {
        user_id: loser.user_id,
        points_before: loser.points,
        points_after: (loser.points + settings.loss_delta).max(settings.points_floor),
        matches_played: loser.matches_played + 1,
        matches_won: loser.matches_won,
        won: false,
    };

    info!(
        "Rating update: user {} {:+}, user {} {:+}",
        winner.user_id,
        winner_change.delta(),
        loser.user_id,
        loser_change.delta()
    );

    (winner_change, loser_change)
}

pub fn history_reason(change: &RatingChange, match_id: MatchId) -> String {
    if change.won {
        format!("Won match #{}", match_id)
    } else {
        format!("Lost match #{}", match_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(user_id: i64, points: i64) -> Standing {
        Standing {
            user_id,
            points,
            matches_played: 4,
            matches_won: 2,
        }
    }

    #[test]
    fn test_winner_gains_and_loser_drops() {
        let settings = RatingSettings::default();
        let (w, l) = score_match(&standing(1, 1000), &standing(2, 1000), &settings);

        assert_eq!(w.points_after, 1025);
        assert_eq!(w.matches_played, 5);
        assert_eq!(w.matches_won, 3);
        assert_eq!(l.points_after, 990);
        assert_eq!(l.matches_played, 5);
        assert_eq!(l.matches_won, 2);
    }

    #[test]
    fn test_loser_points_are_floored() {
        let settings = RatingSettings::default();
        let (_, l) = score_match(&standing(1, 1000), &standing(2, 5), &settings);

        assert_eq!(l.points_after, 0);
        assert_eq!(l.delta(), -5);
    }

    #[test]
    fn test_custom_deltas_are_used() {
        let settings = RatingSettings {
            win_delta: 40,
            loss_delta: -20,
            points_floor: 100,
            ..RatingSettings::default()
        };
        let (w, l) = score_match(&standing(1, 500), &standing(2, 110), &settings);

        assert_eq!(w.delta(), 40);
        assert_eq!(l.points_after, 100);
    }

    #[test]
    fn test_history_reason() {
        let settings = RatingSettings::default();
        let (w, l) = score_match(&standing(1, 1000), &standing(2, 1000), &settings);
        assert_eq!(history_reason(&w, 12), "Won match #12");
        assert_eq!(history_reason(&l, 12), "Lost match #12");
    }
}
