use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use super::models::{Rating, RatingFilter};
use crate::domain::{Points, UserId};

const RATING_COLUMNS: &str = "r.id, r.user_id, r.ntrp_level, r.points, r.matches_played, r.matches_won, r.tournament_wins, r.rank_position, r.updated_at";

const DEFAULT_PAGE_SIZE: usize = 50;

fn parse_rating_row(row: &rusqlite::Row) -> rusqlite::Result<Rating> {
    Ok(Rating {
        id: row.get(0)?,
        user_id: row.get(1)?,
        ntrp_level: row.get(2)?,
        points: row.get(3)?,
        matches_played: row.get(4)?,
        matches_won: row.get(5)?,
        tournament_wins: row.get(6)?,
        rank_position: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn find_by_user(conn: &Connection, user_id: UserId) -> Result<Option<Rating>> {
    let sql = format!("SELECT {} FROM ratings r WHERE r.user_id = ?1", RATING_COLUMNS);

    conn.query_row(&sql, params![user_id], parse_rating_row)
        .optional()
        .context("Failed to query rating by user")
}

/// Inserts a default rating row unless one exists, then returns the row and
/// whether it was created by this call.
///
/// New rows are placed after every existing row so positions stay a
/// permutation; callers re-rank to move them to their real place.
pub fn get_or_create(
    conn: &Connection,
    user_id: UserId,
    starting_points: Points,
    ntrp_level: &str,
) -> Result<(Rating, bool)> {
    let inserted = conn
        .execute(
            "INSERT INTO ratings (user_id, points, ntrp_level, rank_position)
             SELECT ?1, ?2, ?3, (SELECT COUNT(*) FROM ratings) + 1
             WHERE NOT EXISTS (SELECT 1 FROM ratings WHERE user_id = ?1)",
            params![user_id, starting_points, ntrp_level],
        )
        .context("Failed to create default rating")?;

    if inserted > 0 {
        log::debug!("Created default rating for user {}", user_id);
    }

    let rating = find_by_user(conn, user_id)?
        .ok_or_else(|| anyhow::anyhow!("Rating for user {} vanished after insert", user_id))?;
    Ok((rating, inserted > 0))
}

pub fn update_totals(
    conn: &Connection,
    user_id: UserId,
    points: Points,
    matches_played: i32,
    matches_won: i32,
) -> Result<()> {
    conn.execute(
        "UPDATE ratings SET points = ?1, matches_played = ?2, matches_won = ?3, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?4",
        params![points, matches_played, matches_won, user_id],
    )
    .context("Failed to update rating totals")?;
    Ok(())
}

/// All rows in leaderboard order: points descending, user id ascending
pub fn list_in_rank_order(conn: &Connection) -> Result<Vec<Rating>> {
    let sql = format!(
        "SELECT {} FROM ratings r ORDER BY r.points DESC, r.user_id ASC",
        RATING_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_rank(conn: &Connection, user_id: UserId, rank_position: i64) -> Result<()> {
    conn.execute(
        "UPDATE ratings SET rank_position = ?1 WHERE user_id = ?2",
        params![rank_position, user_id],
    )
    .context("Failed to update rank position")?;
    Ok(())
}

pub fn list_filtered(conn: &Connection, filter: &RatingFilter) -> Result<Vec<Rating>> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(level) = &filter.ntrp_level {
        conditions.push("r.ntrp_level = ?");
        values.push(Box::new(level.clone()));
    }
    if let Some(gender) = filter.gender {
        conditions.push("u.gender = ?");
        values.push(Box::new(gender));
    }
    if let Some(city) = &filter.city_contains {
        conditions.push("u.city LIKE ?");
        values.push(Box::new(format!("%{}%", city)));
    }
    if let Some(min_matches) = filter.min_matches {
        conditions.push("r.matches_played >= ?");
        values.push(Box::new(min_matches));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE) as i64;
    let offset = filter.offset.unwrap_or(0) as i64;
    values.push(Box::new(limit));
    values.push(Box::new(offset));

    let sql = format!(
        "SELECT {} FROM ratings r JOIN users u ON u.id = r.user_id {} ORDER BY r.points DESC, r.rank_position ASC LIMIT ? OFFSET ?",
        RATING_COLUMNS, where_clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), parse_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
