use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Match;
use crate::domain::{MatchId, MatchStatus, SetScores, TournamentId, UserId};

const MATCH_COLUMNS: &str = "id, tournament_id, round, player1_id, player2_id, player1_set1, player2_set1, player1_set2, player2_set2, player1_set3, player2_set3, confirmed_by_player1, confirmed_by_player2, status, winner_id, rating_applied, actual_date, created_at, updated_at";

pub fn insert_match(
    conn: &Connection,
    tournament_id: TournamentId,
    round: &str,
    player1_id: UserId,
    player2_id: UserId,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (tournament_id, round, player1_id, player2_id, status) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        MATCH_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            tournament_id,
            round,
            player1_id,
            player2_id,
            MatchStatus::Scheduled
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    let columns = [
        (row.get(5)?, row.get(6)?),
        (row.get(7)?, row.get(8)?),
        (row.get(9)?, row.get(10)?),
    ];

    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        round: row.get(2)?,
        player1_id: row.get(3)?,
        player2_id: row.get(4)?,
        score: SetScores::from_columns(&columns),
        confirmed_by_player1: row.get(11)?,
        confirmed_by_player2: row.get(12)?,
        status: row.get(13)?,
        winner_id: row.get(14)?,
        rating_applied: row.get(15)?,
        actual_date: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = format!("SELECT {} FROM matches WHERE id = ?1", MATCH_COLUMNS);

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn count_for_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM matches WHERE tournament_id = ?1",
        params![tournament_id],
        |row| row.get(0),
    )
    .context("Failed to count matches for tournament")
}

pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches WHERE tournament_id = ?1 ORDER BY id",
        MATCH_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Open matches in which the player has not reported a score yet
pub fn list_awaiting_player(conn: &Connection, player_id: UserId) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches
         WHERE status IN ('SCHEDULED', 'IN_PROGRESS', 'DISPUTED')
           AND ((player1_id = ?1 AND confirmed_by_player1 = 0)
             OR (player2_id = ?1 AND confirmed_by_player2 = 0))
         ORDER BY id",
        MATCH_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_confirmations(
    conn: &Connection,
    id: MatchId,
    confirmed_by_player1: bool,
    confirmed_by_player2: bool,
    status: MatchStatus,
) -> Result<()> {
    conn.execute(
        "UPDATE matches SET confirmed_by_player1 = ?1, confirmed_by_player2 = ?2, status = ?3, updated_at = CURRENT_TIMESTAMP WHERE id = ?4",
        params![confirmed_by_player1, confirmed_by_player2, status, id],
    )
    .context("Failed to update match confirmations")?;
    Ok(())
}

/// Writes the agreed score and winner and closes the match
pub fn record_result(
    conn: &Connection,
    id: MatchId,
    score: &SetScores,
    winner_id: UserId,
    played_at: NaiveDateTime,
) -> Result<()> {
    let [(p1s1, p2s1), (p1s2, p2s2), (p1s3, p2s3)] = score.to_columns();

    conn.execute(
        "UPDATE matches SET player1_set1 = ?1, player2_set1 = ?2, player1_set2 = ?3, player2_set2 = ?4, player1_set3 = ?5, player2_set3 = ?6, confirmed_by_player1 = 1, confirmed_by_player2 = 1, winner_id = ?7, status = ?8, actual_date = ?9, updated_at = CURRENT_TIMESTAMP WHERE id = ?10",
        params![
            p1s1,
            p2s1,
            p1s2,
            p2s2,
            p1s3,
            p2s3,
            winner_id,
            MatchStatus::Finished,
            played_at,
            id
        ],
    )
    .context("Failed to record match result")?;
    Ok(())
}

/// Sets the rating flag and reports whether this call was the one that set it
pub fn claim_rating_update(conn: &Connection, id: MatchId) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE matches SET rating_applied = 1 WHERE id = ?1 AND rating_applied = 0",
            params![id],
        )
        .context("Failed to claim rating update")?;
    Ok(changed == 1)
}

pub fn update_status(conn: &Connection, id: MatchId, status: MatchStatus) -> Result<()> {
    conn.execute(
        "UPDATE matches SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
        params![status, id],
    )
    .context("Failed to update match status")?;
    Ok(())
}
