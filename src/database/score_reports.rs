use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::ScoreReport;
use crate::domain::{MatchId, SetScores, UserId};

/// Stores the reporter's claimed score, replacing any earlier claim of theirs
pub fn upsert_report(
    conn: &Connection,
    match_id: MatchId,
    reporter_id: UserId,
    sets: &SetScores,
) -> Result<ScoreReport> {
    let encoded = serde_json::to_string(sets).context("Failed to encode score report")?;
    let sql = "INSERT INTO score_reports (match_id, reporter_id, sets) VALUES (?1, ?2, ?3)
               ON CONFLICT (match_id, reporter_id)
               DO UPDATE SET sets = excluded.sets, submitted_at = CURRENT_TIMESTAMP
               RETURNING id, match_id, reporter_id, sets, submitted_at";

    conn.query_row(sql, params![match_id, reporter_id, encoded], parse_report_row)
        .context("Failed to store score report")
}

fn parse_report_row(row: &rusqlite::Row) -> rusqlite::Result<ScoreReport> {
    let raw: String = row.get(3)?;
    let sets = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ScoreReport {
        id: row.get(0)?,
        match_id: row.get(1)?,
        reporter_id: row.get(2)?,
        sets,
        submitted_at: row.get(4)?,
    })
}

pub fn list_by_match(conn: &Connection, match_id: MatchId) -> Result<Vec<ScoreReport>> {
    let sql = "SELECT id, match_id, reporter_id, sets, submitted_at FROM score_reports WHERE match_id = ?1 ORDER BY submitted_at, id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_report_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
