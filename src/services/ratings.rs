use log::{info, warn};
use rusqlite::Connection;

use super::{require_user, LeagueService};
use crate::database::{
    begin_write, matches, rating_history, ratings, Rating, RatingFilter, RatingHistoryEntry,
};
use crate::domain::{MatchId, UserId};
use crate::errors::LeagueResult;
use crate::rating::{engine, MatchOutcome, RatingChange, Standing};

impl LeagueService {
    /// Returns the player's rating, creating the default one on first use
    pub fn get_rating(&self, user_id: UserId) -> LeagueResult<Rating> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        require_user(&tx, user_id)?;

        let rating = self.get_or_create_rating(&tx, user_id)?;
        tx.commit()?;
        Ok(rating)
    }

    /// Leaderboard slice ordered by points, then rank position
    pub fn list_ratings(&self, filter: &RatingFilter) -> LeagueResult<Vec<Rating>> {
        let conn = self.connection()?;
        Ok(ratings::list_filtered(&conn, filter)?)
    }

    pub fn rating_history(&self, user_id: UserId) -> LeagueResult<Vec<RatingHistoryEntry>> {
        let conn = self.connection()?;
        require_user(&conn, user_id)?;
        Ok(rating_history::list_by_user(&conn, user_id)?)
    }

    /// History rows written for one match, at most one per player
    pub fn match_rating_changes(&self, match_id: MatchId) -> LeagueResult<Vec<RatingHistoryEntry>> {
        let conn = self.connection()?;
        Ok(rating_history::list_by_match(&conn, match_id)?)
    }

    /// Maintenance entry point; rank positions are normally kept current by match updates
    pub fn recompute_ranks(&self) -> LeagueResult<usize> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        let written = self.ranking.recompute(&tx)?;
        tx.commit()?;

        info!("Recomputed ranks ({}): {} rows written", self.ranking.name(), written);
        Ok(written)
    }

    fn get_or_create_rating(&self, conn: &Connection, user_id: UserId) -> LeagueResult<Rating> {
        let settings = &self.config.rating;
        let (rating, created) = ratings::get_or_create(
            conn,
            user_id,
            settings.starting_points,
            settings.default_ntrp_level,
        )?;

        if !created {
            return Ok(rating);
        }

        self.ranking.recompute(conn)?;
        Ok(ratings::find_by_user(conn, user_id)?.unwrap_or(rating))
    }

    /// Applies an agreed match to both players' ratings, appends their
    /// history rows and re-ranks everyone.
    ///
    /// Runs inside the caller's write transaction. The match's
    /// `rating_applied` flag is claimed first; if it was already set this is
    /// a no-op returning `None`.
    pub(crate) fn apply_match_outcome(
        &self,
        conn: &Connection,
        outcome: &MatchOutcome,
    ) -> LeagueResult<Option<(RatingChange, RatingChange)>> {
        if !matches::claim_rating_update(conn, outcome.match_id)? {
            warn!(
                "Rating for match {} was already applied, skipping",
                outcome.match_id
            );
            return Ok(None);
        }

        let settings = &self.config.rating;
        let (winner, _) = ratings::get_or_create(
            conn,
            outcome.winner_id,
            settings.starting_points,
            settings.default_ntrp_level,
        )?;
        let (loser, _) = ratings::get_or_create(
            conn,
            outcome.loser_id,
            settings.starting_points,
            settings.default_ntrp_level,
        )?;

        let (winner_change, loser_change) =
            engine::score_match(&standing(&winner), &standing(&loser), settings);

        for change in [&winner_change, &loser_change] {
            ratings::update_totals(
                conn,
                change.user_id,
                change.points_after,
                change.matches_played,
                change.matches_won,
            )?;
            rating_history::append_entry(
                conn,
                change.user_id,
                change.points_after,
                change.delta(),
                Some(outcome.match_id),
                Some(outcome.tournament_id),
                &engine::history_reason(change, outcome.match_id),
            )?;
        }

        self.ranking.recompute(conn)?;
        Ok(Some((winner_change, loser_change)))
    }
}

fn standing(rating: &Rating) -> Standing {
    Standing {
        user_id: rating.user_id,
        points: rating.points,
        matches_played: rating.matches_played,
        matches_won: rating.matches_won,
    }
}
