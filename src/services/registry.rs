use log::info;
use rusqlite::Connection;

use super::{referrals::create_referral_in, require_staff, require_user, LeagueService};
use crate::database::{
    begin_write, participants, tournaments, NewTournament, Participant, Referral, Tournament,
    TournamentFilter,
};
use crate::domain::{TournamentId, TournamentStatus, UserId};
use crate::errors::{is_unique_violation, LeagueError, LeagueResult};

impl LeagueService {
    pub fn create_tournament(&self, new: &NewTournament) -> LeagueResult<Tournament> {
        validate_new_tournament(new)?;

        let conn = self.connection()?;
        let tournament = tournaments::insert_tournament(&conn, new)?;
        info!(
            "Created tournament {} '{}' ({} to {})",
            tournament.id, tournament.name, tournament.start_date, tournament.end_date
        );
        Ok(tournament)
    }

    pub fn get_tournament(&self, tournament_id: TournamentId) -> LeagueResult<Tournament> {
        let conn = self.connection()?;
        require_tournament(&conn, tournament_id)
    }

    pub fn list_tournaments(&self, filter: &TournamentFilter) -> LeagueResult<Vec<Tournament>> {
        let conn = self.connection()?;
        Ok(tournaments::list_filtered(&conn, filter)?)
    }

    /// Status changes are administrative; the core never moves a tournament on its own
    pub fn set_tournament_status(
        &self,
        tournament_id: TournamentId,
        requested_by: UserId,
        status: TournamentStatus,
    ) -> LeagueResult<Tournament> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        require_staff(&tx, requested_by)?;
        require_tournament(&tx, tournament_id)?;
        tournaments::update_status(&tx, tournament_id, status)?;
        let tournament = require_tournament(&tx, tournament_id)?;
        tx.commit()?;

        info!("Tournament {} is now {}", tournament_id, status);
        Ok(tournament)
    }

    pub fn register(&self, tournament_id: TournamentId, user_id: UserId) -> LeagueResult<Participant> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        let participant = register_in(&tx, tournament_id, user_id)?;
        tx.commit()?;

        info!("User {} registered for tournament {}", user_id, tournament_id);
        Ok(participant)
    }

    /// Registers a player who was invited by `referrer_id` and records the
    /// pending referral bonus in the same transaction
    pub fn register_with_referral(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
        referrer_id: UserId,
    ) -> LeagueResult<(Participant, Referral)> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        let participant = register_in(&tx, tournament_id, user_id)?;
        let referral = create_referral_in(
            &tx,
            referrer_id,
            user_id,
            tournament_id,
            self.config.referral.default_bonus,
        )?;
        tx.commit()?;

        info!(
            "User {} registered for tournament {} (referred by {})",
            user_id, tournament_id, referrer_id
        );
        Ok((participant, referral))
    }

    pub fn set_seed(
        &self,
        tournament_id: TournamentId,
        requested_by: UserId,
        user_id: UserId,
        seed: Option<i32>,
    ) -> LeagueResult<()> {
        let mut conn = self.connection()?;
        let tx = begin_write(&mut conn)?;
        require_staff(&tx, requested_by)?;
        require_tournament(&tx, tournament_id)?;
        if !participants::is_registered(&tx, tournament_id, user_id)? {
            return Err(LeagueError::UserNotFound(user_id));
        }
        participants::update_seed(&tx, tournament_id, user_id, seed)?;
        tx.commit()?;
        Ok(())
    }

    pub fn list_participants(&self, tournament_id: TournamentId) -> LeagueResult<Vec<Participant>> {
        let conn = self.connection()?;
        require_tournament(&conn, tournament_id)?;
        Ok(participants::list_by_tournament(&conn, tournament_id)?)
    }
}

pub(crate) fn require_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
) -> LeagueResult<Tournament> {
    tournaments::find_by_id(conn, tournament_id)?
        .ok_or(LeagueError::TournamentNotFound(tournament_id))
}

fn validate_new_tournament(new: &NewTournament) -> LeagueResult<()> {
    if new.name.trim().is_empty() {
        return Err(LeagueError::InvalidTournament("name is empty".to_string()));
    }
    if new.start_date > new.end_date {
        return Err(LeagueError::InvalidTournament(format!(
            "start date {} is after end date {}",
            new.start_date, new.end_date
        )));
    }
    if new.max_participants < 2 {
        return Err(LeagueError::InvalidTournament(format!(
            "max_participants must be at least 2, got {}",
            new.max_participants
        )));
    }
    Ok(())
}

/// Capacity and uniqueness checks plus the insert. Must run inside a write
/// transaction so the participant count cannot change underneath.
fn register_in(
    conn: &Connection,
    tournament_id: TournamentId,
    user_id: UserId,
) -> LeagueResult<Participant> {
    let tournament = require_tournament(conn, tournament_id)?;
    require_user(conn, user_id)?;

    if participants::is_registered(conn, tournament_id, user_id)? {
        return Err(LeagueError::AlreadyRegistered {
            tournament_id,
            user_id,
        });
    }

    let count = participants::count_for_tournament(conn, tournament_id)?;
    if count >= tournament.max_participants as usize {
        return Err(LeagueError::CapacityExceeded {
            tournament_id,
            max_participants: tournament.max_participants,
        });
    }

    participants::insert_participant(conn, tournament_id, user_id).map_err(|e| {
        if is_unique_violation(&e) {
            LeagueError::AlreadyRegistered {
                tournament_id,
                user_id,
            }
        } else {
            e.into()
        }
    })
}
