use chrono::Utc;
use log::{info, warn};
use rusqlite::Connection;

use super::{registry::require_tournament, require_staff, require_user, LeagueService};
use crate::database::{begin_write, matches, score_reports, Match, ScoreReport};
use crate::domain::{MatchId, MatchStatus, SetScores, Side, TournamentId, UserId};
use crate::errors::{LeagueError, LeagueResult};
use crate::rating::MatchOutcome;

/// What a new score report did to the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportOutcome {
    AwaitingOpponent,
    Agreed,
    Disputed,
}

impl LeagueService {
    /// Records `player_id`'s claimed result for the match.
    ///
    /// Each player owns one score report. The match finishes, and ratings
    /// are updated, only once both reports exist and agree; conflicting
    /// reports put the match into DISPUTED until one side re-submits.
    /// Everything happens in one write transaction.
    pub fn submit_result(
        &self,
        match_id: MatchId,
        player_id: UserId,
        set_scores: &SetScores,
    ) -> LeagueResult<Match> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;

        let current = require_match(&tx, match_id)?;
        let side = current
            .side_of(player_id)
            .ok_or(LeagueError::NotParticipant { match_id, user_id: player_id })?;

        if current.status.is_closed() {
            return Err(LeagueError::MatchClosed(match_id));
        }

        let winner_side = set_scores.winner()?;

        score_reports::upsert_report(&tx, match_id, player_id, set_scores)?;
        let opponent_id = current.player(side.opponent());
        let opponent_report = score_reports::list_by_match(&tx, match_id)?
            .into_iter()
            .find(|r| r.reporter_id == opponent_id);

        let outcome = classify_report(set_scores, opponent_report.as_ref());
        match outcome {
            ReportOutcome::AwaitingOpponent => {
                let (p1, p2) = confirmations_for(side, current.is_confirmed_by(side.opponent()));
                matches::update_confirmations(&tx, match_id, p1, p2, MatchStatus::InProgress)?;
            }
            ReportOutcome::Disputed => {
                let (p1, p2) = confirmations_for(side, false);
                matches::update_confirmations(&tx, match_id, p1, p2, MatchStatus::Disputed)?;
                warn!(
                    "Match {}: reports of users {} and {} disagree",
                    match_id, player_id, opponent_id
                );
            }
            ReportOutcome::Agreed => {
                self.finish_match(&tx, &current, set_scores, winner_side)?;
            }
        }

        let updated = require_match(&tx, match_id)?;
        tx.commit()?;

        info!(
            "Match {}: user {} reported {} ({:?}), status {}, score {}",
            match_id,
            player_id,
            set_scores,
            outcome,
            updated.status,
            updated.score_line()
        );
        Ok(updated)
    }

    /// Staff decision on a disputed match; the given score becomes the agreed result
    pub fn resolve_dispute(
        &self,
        match_id: MatchId,
        requested_by: UserId,
        set_scores: &SetScores,
    ) -> LeagueResult<Match> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        require_staff(&tx, requested_by)?;

        let current = require_match(&tx, match_id)?;
        if current.status != MatchStatus::Disputed {
            return Err(LeagueError::InvalidTransition(format!(
                "match {} is {}, only DISPUTED matches can be resolved",
                match_id, current.status
            )));
        }

        let winner_side = set_scores.winner()?;
        self.finish_match(&tx, &current, set_scores, winner_side)?;

        let updated = require_match(&tx, match_id)?;
        tx.commit()?;

        info!(
            "Match {}: dispute resolved by {} as {}",
            match_id, requested_by, set_scores
        );
        Ok(updated)
    }

    pub fn cancel_match(&self, match_id: MatchId, requested_by: UserId) -> LeagueResult<Match> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        require_staff(&tx, requested_by)?;

        let current = require_match(&tx, match_id)?;
        if current.status.is_closed() {
            return Err(LeagueError::MatchClosed(match_id));
        }

        matches::update_status(&tx, match_id, MatchStatus::Cancelled)?;
        let updated = require_match(&tx, match_id)?;
        tx.commit()?;

        info!("Match {} cancelled by {}", match_id, requested_by);
        Ok(updated)
    }

    pub fn get_match(&self, match_id: MatchId) -> LeagueResult<Match> {
        let conn = self.connection()?;
        require_match(&conn, match_id)
    }

    pub fn list_matches(&self, tournament_id: TournamentId) -> LeagueResult<Vec<Match>> {
        let conn = self.connection()?;
        require_tournament(&conn, tournament_id)?;
        Ok(matches::list_by_tournament(&conn, tournament_id)?)
    }

    pub fn score_reports(&self, match_id: MatchId) -> LeagueResult<Vec<ScoreReport>> {
        let conn = self.connection()?;
        require_match(&conn, match_id)?;
        Ok(score_reports::list_by_match(&conn, match_id)?)
    }

    /// Open matches still waiting for this player's score report
    pub fn pending_confirmations(&self, user_id: UserId) -> LeagueResult<Vec<Match>> {
        let conn = self.connection()?;
        require_user(&conn, user_id)?;
        Ok(matches::list_awaiting_player(&conn, user_id)?)
    }

    fn finish_match(
        &self,
        conn: &Connection,
        current: &Match,
        set_scores: &SetScores,
        winner_side: Side,
    ) -> LeagueResult<()> {
        let winner_id = current.player(winner_side);
        let loser_id = current.player(winner_side.opponent());

        matches::record_result(conn, current.id, set_scores, winner_id, Utc::now().naive_utc())?;

        let outcome = MatchOutcome {
            match_id: current.id,
            tournament_id: current.tournament_id,
            winner_id,
            loser_id,
        };
        self.apply_match_outcome(conn, &outcome)?;

        info!(
            "Match {} finished: user {} beat user {} {}",
            current.id, winner_id, loser_id, set_scores
        );
        Ok(())
    }
}

fn require_match(conn: &Connection, match_id: MatchId) -> LeagueResult<Match> {
    matches::find_by_id(conn, match_id)?.ok_or(LeagueError::MatchNotFound(match_id))
}

fn classify_report(own: &SetScores, opponent: Option<&ScoreReport>) -> ReportOutcome {
    match opponent {
        None => ReportOutcome::AwaitingOpponent,
        Some(report) if report.sets == *own => ReportOutcome::Agreed,
        Some(_) => ReportOutcome::Disputed,
    }
}

/// Confirmation flags (player1, player2) after `side` reported
fn confirmations_for(side: Side, opponent_confirmed: bool) -> (bool, bool) {
    match side {
        Side::Player1 => (true, opponent_confirmed),
        Side::Player2 => (opponent_confirmed, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report(pairs: &[(u8, u8)]) -> ScoreReport {
        ScoreReport {
            id: 1,
            match_id: 1,
            reporter_id: 2,
            sets: SetScores::from_pairs(pairs),
            submitted_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_first_report_waits_for_opponent() {
        let own = SetScores::from_pairs(&[(6, 3), (6, 4)]);
        assert_eq!(classify_report(&own, None), ReportOutcome::AwaitingOpponent);
    }

    #[test]
    fn test_matching_reports_agree() {
        let own = SetScores::from_pairs(&[(6, 3), (4, 6), (6, 2)]);
        let other = report(&[(6, 3), (4, 6), (6, 2)]);
        assert_eq!(classify_report(&own, Some(&other)), ReportOutcome::Agreed);
    }

    #[test]
    fn test_different_reports_are_disputed() {
        let own = SetScores::from_pairs(&[(6, 3), (6, 4)]);
        let other = report(&[(3, 6), (4, 6)]);
        assert_eq!(classify_report(&own, Some(&other)), ReportOutcome::Disputed);
    }

    #[test]
    fn test_confirmations_for_each_side() {
        assert_eq!(confirmations_for(Side::Player1, false), (true, false));
        assert_eq!(confirmations_for(Side::Player2, true), (true, true));
    }
}
