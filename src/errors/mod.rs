use thiserror::Error;

use crate::domain::{MatchId, ReferralId, TournamentId, UserId};

pub type LeagueResult<T> = Result<T, LeagueError>;

/// Broad classification used by callers to decide how to surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Authorization,
    NotFound,
    Storage,
}

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Not enough participants for a draw: {count} registered, {required} required")]
    InsufficientParticipants { count: usize, required: usize },

    #[error("Draw needs an even number of participants, got {0}")]
    OddParticipantCount(usize),

    #[error("Invalid tournament: {0}")]
    InvalidTournament(String),

    #[error("Invalid referral: {0}")]
    InvalidReferral(String),

    #[error("Draw already generated for tournament {0}")]
    DrawAlreadyGenerated(TournamentId),

    #[error("User {user_id} is already registered for tournament {tournament_id}")]
    AlreadyRegistered {
        tournament_id: TournamentId,
        user_id: UserId,
    },

    #[error("Referral already exists for this referrer, referred user and tournament")]
    DuplicateReferral,

    #[error("Tournament {tournament_id} is full ({max_participants} participants)")]
    CapacityExceeded {
        tournament_id: TournamentId,
        max_participants: i32,
    },

    #[error("Match {0} is already closed")]
    MatchClosed(MatchId),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("User {0} is not allowed to perform this operation")]
    Unauthorized(UserId),

    #[error("User {user_id} does not play in match {match_id}")]
    NotParticipant { match_id: MatchId, user_id: UserId },

    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Referral {0} not found")]
    ReferralNotFound(ReferralId),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LeagueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeagueError::InvalidScore(_)
            | LeagueError::InsufficientParticipants { .. }
            | LeagueError::OddParticipantCount(_)
            | LeagueError::InvalidTournament(_)
            | LeagueError::InvalidReferral(_) => ErrorKind::Validation,
            LeagueError::DrawAlreadyGenerated(_)
            | LeagueError::AlreadyRegistered { .. }
            | LeagueError::DuplicateReferral
            | LeagueError::CapacityExceeded { .. }
            | LeagueError::MatchClosed(_)
            | LeagueError::InvalidTransition(_) => ErrorKind::Conflict,
            LeagueError::Unauthorized(_) | LeagueError::NotParticipant { .. } => {
                ErrorKind::Authorization
            }
            LeagueError::TournamentNotFound(_)
            | LeagueError::MatchNotFound(_)
            | LeagueError::UserNotFound(_)
            | LeagueError::ReferralNotFound(_) => ErrorKind::NotFound,
            LeagueError::Database(_) | LeagueError::Pool(_) | LeagueError::Internal(_) => {
                ErrorKind::Storage
            }
        }
    }
}

/// True when the SQLite error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
