use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Referral;
use crate::domain::{ReferralId, ReferralStatus, TournamentId, UserId};

const REFERRAL_COLUMNS: &str =
    "id, referrer_id, referred_id, tournament_id, bonus_amount, status, created_at, paid_at";

pub fn insert_referral(
    conn: &Connection,
    referrer_id: UserId,
    referred_id: UserId,
    tournament_id: TournamentId,
    bonus_amount: i64,
) -> rusqlite::Result<Referral> {
    let sql = format!(
        "INSERT INTO referrals (referrer_id, referred_id, tournament_id, bonus_amount, status) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        REFERRAL_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            referrer_id,
            referred_id,
            tournament_id,
            bonus_amount,
            ReferralStatus::Pending
        ],
        parse_referral_row,
    )
}

fn parse_referral_row(row: &rusqlite::Row) -> rusqlite::Result<Referral> {
    Ok(Referral {
        id: row.get(0)?,
        referrer_id: row.get(1)?,
        referred_id: row.get(2)?,
        tournament_id: row.get(3)?,
        bonus_amount: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        paid_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, id: ReferralId) -> Result<Option<Referral>> {
    let sql = format!("SELECT {} FROM referrals WHERE id = ?1", REFERRAL_COLUMNS);

    conn.query_row(&sql, params![id], parse_referral_row)
        .optional()
        .context("Failed to query referral by id")
}

/// Moves a referral out of PENDING. Returns the updated row, or None when the
/// referral was no longer pending.
pub fn settle(
    conn: &Connection,
    id: ReferralId,
    status: ReferralStatus,
    paid_at: Option<NaiveDateTime>,
) -> Result<Option<Referral>> {
    let sql = format!(
        "UPDATE referrals SET status = ?1, paid_at = ?2 WHERE id = ?3 AND status = ?4 RETURNING {}",
        REFERRAL_COLUMNS
    );

    conn.query_row(
        &sql,
        params![status, paid_at, id, ReferralStatus::Pending],
        parse_referral_row,
    )
    .optional()
    .context("Failed to update referral status")
}

pub fn list_by_referrer(conn: &Connection, referrer_id: UserId) -> Result<Vec<Referral>> {
    let sql = format!(
        "SELECT {} FROM referrals WHERE referrer_id = ?1 ORDER BY created_at DESC, id DESC",
        REFERRAL_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![referrer_id], parse_referral_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn sum_bonus_by_status(
    conn: &Connection,
    referrer_id: UserId,
    status: ReferralStatus,
) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(bonus_amount), 0) FROM referrals WHERE referrer_id = ?1 AND status = ?2",
        params![referrer_id, status],
        |row| row.get(0),
    )
    .context("Failed to sum referral bonuses")
}
