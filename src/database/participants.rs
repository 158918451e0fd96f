use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::Participant;
use crate::domain::{TournamentId, UserId};

const PARTICIPANT_COLUMNS: &str = "id, tournament_id, user_id, seed, registered_at";

pub fn insert_participant(
    conn: &Connection,
    tournament_id: TournamentId,
    user_id: UserId,
) -> rusqlite::Result<Participant> {
    let sql = format!(
        "INSERT INTO participants (tournament_id, user_id) VALUES (?1, ?2) RETURNING {}",
        PARTICIPANT_COLUMNS
    );

    conn.query_row(&sql, params![tournament_id, user_id], parse_participant_row)
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        user_id: row.get(2)?,
        seed: row.get(3)?,
        registered_at: row.get(4)?,
    })
}

pub fn count_for_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM participants WHERE tournament_id = ?1",
        params![tournament_id],
        |row| row.get(0),
    )
    .context("Failed to count participants")
}

pub fn is_registered(
    conn: &Connection,
    tournament_id: TournamentId,
    user_id: UserId,
) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM participants WHERE tournament_id = ?1 AND user_id = ?2)",
        params![tournament_id, user_id],
        |row| row.get(0),
    )
    .context("Failed to check participant registration")
}

/// Participants ordered by seed (unseeded last), then by registration time
pub fn list_by_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
) -> Result<Vec<Participant>> {
    let sql = format!(
        "SELECT {} FROM participants WHERE tournament_id = ?1 ORDER BY seed IS NULL, seed, registered_at, id",
        PARTICIPANT_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_seed(
    conn: &Connection,
    tournament_id: TournamentId,
    user_id: UserId,
    seed: Option<i32>,
) -> Result<usize> {
    conn.execute(
        "UPDATE participants SET seed = ?1 WHERE tournament_id = ?2 AND user_id = ?3",
        params![seed, tournament_id, user_id],
    )
    .context("Failed to update participant seed")
}
