use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::database::ratings;
use crate::domain::{Points, UserId};

/// Rewrites `rank_position` so that it is a dense 1..N permutation over all
/// rating rows ordered by points descending, ties broken by user id.
///
/// Implementations run inside the caller's write transaction.
pub trait RankingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the number of rows whose position was written
    fn recompute(&self, conn: &Connection) -> Result<usize>;
}

/// Reads every rating, sorts in memory and writes every position back
#[derive(Debug, Default, Clone, Copy)]
pub struct FullRecompute;

impl RankingStrategy for FullRecompute {
    fn name(&self) -> &'static str {
        "full"
    }

    fn recompute(&self, conn: &Connection) -> Result<usize> {
        let rows: Vec<(UserId, Points)> = ratings::list_in_rank_order(conn)?
            .into_iter()
            .map(|r| (r.user_id, r.points))
            .collect();

        let ranked = dense_ranks(&rows);
        for (user_id, position) in &ranked {
            ratings::set_rank(conn, *user_id, *position)?;
        }
        Ok(ranked.len())
    }
}

/// Lets SQLite compute the order with a window function and only touches
/// rows whose position actually moved
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowedRecompute;

impl RankingStrategy for WindowedRecompute {
    fn name(&self) -> &'static str {
        "windowed"
    }

    fn recompute(&self, conn: &Connection) -> Result<usize> {
        let sql = "UPDATE ratings SET rank_position = ranked.position
                   FROM (
                       SELECT user_id,
                              ROW_NUMBER() OVER (ORDER BY points DESC, user_id ASC) AS position
                       FROM ratings
                   ) AS ranked
                   WHERE ratings.user_id = ranked.user_id
                     AND ratings.rank_position IS NOT ranked.position";

        conn.execute(sql, [])
            .context("Failed to recompute rank positions")
    }
}

/// Assigns positions 1..N to rows that are already in leaderboard order
pub fn dense_ranks(ordered: &[(UserId, Points)]) -> Vec<(UserId, i64)> {
    ordered
        .iter()
        .enumerate()
        .map(|(idx, (user_id, _))| (*user_id, idx as i64 + 1))
        .collect()
}

pub fn strategy_by_name(name: &str) -> Option<Box<dyn RankingStrategy>> {
    match name {
        "full" => Some(Box::new(FullRecompute)),
        "windowed" => Some(Box::new(WindowedRecompute)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn ratings_db(points: &[(UserId, Points)]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../database/schema.sql"))
            .unwrap();
        for (user_id, pts) in points {
            conn.execute(
                "INSERT INTO ratings (user_id, points) VALUES (?1, ?2)",
                params![user_id, pts],
            )
            .unwrap();
        }
        conn
    }

    fn positions(conn: &Connection) -> Vec<(UserId, i64)> {
        let mut stmt = conn
            .prepare("SELECT user_id, rank_position FROM ratings ORDER BY rank_position")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap()
    }

    const FIELD: [(UserId, Points); 5] = [(1, 990), (2, 1025), (3, 1000), (4, 1000), (5, 0)];

    #[test]
    fn test_full_recompute_orders_by_points_then_user() {
        let conn = ratings_db(&FIELD);
        let written = FullRecompute.recompute(&conn).unwrap();

        assert_eq!(written, 5);
        assert_eq!(
            positions(&conn),
            vec![(2, 1), (3, 2), (4, 3), (1, 4), (5, 5)]
        );
    }

    #[test]
    fn test_windowed_matches_full() {
        let full = ratings_db(&FIELD);
        FullRecompute.recompute(&full).unwrap();

        let windowed = ratings_db(&FIELD);
        WindowedRecompute.recompute(&windowed).unwrap();

        assert_eq!(positions(&full), positions(&windowed));
    }

    #[test]
    fn test_windowed_only_rewrites_moved_rows() {
        let conn = ratings_db(&FIELD);
        WindowedRecompute.recompute(&conn).unwrap();

        conn.execute("UPDATE ratings SET points = 1010 WHERE user_id = 4", [])
            .unwrap();
        let written = WindowedRecompute.recompute(&conn).unwrap();

        assert_eq!(written, 2);
        assert_eq!(positions(&conn)[1], (4, 2));
    }

    #[test]
    fn test_dense_ranks() {
        assert_eq!(dense_ranks(&[(9, 50), (3, 50)]), vec![(9, 1), (3, 2)]);
        assert!(dense_ranks(&[]).is_empty());
    }

    #[test]
    fn test_strategy_by_name() {
        assert_eq!(strategy_by_name("full").unwrap().name(), "full");
        assert_eq!(strategy_by_name("windowed").unwrap().name(), "windowed");
        assert!(strategy_by_name("elo").is_none());
    }
}
