use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::User;
use crate::domain::{Gender, UserId};

const USER_COLUMNS: &str = "id, username, is_staff, gender, city, created_at";

pub fn insert_user(
    conn: &Connection,
    username: &str,
    is_staff: bool,
    gender: Option<Gender>,
    city: &str,
) -> Result<User> {
    let sql = format!(
        "INSERT INTO users (username, is_staff, gender, city) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        USER_COLUMNS
    );

    conn.query_row(&sql, params![username, is_staff, gender, city], parse_user_row)
        .with_context(|| format!("Failed to insert user {}", username))
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        is_staff: row.get(2)?,
        gender: row.get(3)?,
        city: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);

    conn.query_row(&sql, params![id], parse_user_row)
        .optional()
        .context("Failed to query user by id")
}
