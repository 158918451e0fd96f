use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::RatingHistoryEntry;
use crate::domain::{MatchId, Points, TournamentId, UserId};

/// Appends an entry. History rows are never updated or deleted.
pub fn append_entry(
    conn: &Connection,
    user_id: UserId,
    points: Points,
    change: Points,
    match_id: Option<MatchId>,
    tournament_id: Option<TournamentId>,
    reason: &str,
) -> Result<RatingHistoryEntry> {
    let sql = "INSERT INTO rating_history (user_id, points, change, match_id, tournament_id, reason) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id, user_id, points, match_id, tournament_id, change, reason, created_at";

    conn.query_row(
        sql,
        params![user_id, points, change, match_id, tournament_id, reason],
        parse_history_row,
    )
    .context("Failed to append rating history")
}

fn parse_history_row(row: &rusqlite::Row) -> rusqlite::Result<RatingHistoryEntry> {
    Ok(RatingHistoryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        points: row.get(2)?,
        match_id: row.get(3)?,
        tournament_id: row.get(4)?,
        change: row.get(5)?,
        reason: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Newest first
pub fn list_by_user(conn: &Connection, user_id: UserId) -> Result<Vec<RatingHistoryEntry>> {
    let sql = "SELECT id, user_id, points, match_id, tournament_id, change, reason, created_at FROM rating_history WHERE user_id = ?1 ORDER BY id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_match(conn: &Connection, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>> {
    let sql = "SELECT id, user_id, points, match_id, tournament_id, change, reason, created_at FROM rating_history WHERE match_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
