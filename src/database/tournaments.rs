use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::models::{NewTournament, Tournament, TournamentFilter};
use crate::domain::{TournamentId, TournamentStatus};

const TOURNAMENT_COLUMNS: &str = "id, name, description, category, level, region, location, start_date, end_date, status, scoring_system, max_participants, entry_fee, created_at";

pub fn insert_tournament(conn: &Connection, new: &NewTournament) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (name, description, category, level, region, location, start_date, end_date, scoring_system, max_participants, entry_fee) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING {}",
        TOURNAMENT_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            new.name,
            new.description,
            new.category,
            new.level,
            new.region,
            new.location,
            new.start_date,
            new.end_date,
            new.scoring_system,
            new.max_participants,
            new.entry_fee
        ],
        parse_tournament_row,
    )
    .context("Failed to insert new tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        level: row.get(4)?,
        region: row.get(5)?,
        location: row.get(6)?,
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        status: row.get(9)?,
        scoring_system: row.get(10)?,
        max_participants: row.get(11)?,
        entry_fee: row.get(12)?,
        created_at: row.get(13)?,
    })
}

pub fn find_by_id(conn: &Connection, id: TournamentId) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {} FROM tournaments WHERE id = ?1", TOURNAMENT_COLUMNS);

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

/// Tournaments matching the filter, latest start date first
pub fn list_filtered(conn: &Connection, filter: &TournamentFilter) -> Result<Vec<Tournament>> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(category) = filter.category {
        conditions.push("category = ?");
        values.push(Box::new(category));
    }
    if let Some(status) = filter.status {
        conditions.push("status = ?");
        values.push(Box::new(status));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT {} FROM tournaments {} ORDER BY start_date DESC, id DESC",
        TOURNAMENT_COLUMNS, where_clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_status(
    conn: &Connection,
    id: TournamentId,
    status: TournamentStatus,
) -> Result<usize> {
    conn.execute(
        "UPDATE tournaments SET status = ?1 WHERE id = ?2",
        params![status, id],
    )
    .context("Failed to update tournament status")
}
