pub mod draw;
pub mod lifecycle;
pub mod ratings;
pub mod referrals;
pub mod registry;
pub mod server;

use anyhow::Result;
use log::info;
use rusqlite::Connection;
use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::database::{self, users, DbConn, DbPool, User};
use crate::domain::{Gender, UserId};
use crate::errors::{LeagueError, LeagueResult};
use crate::rating::{FullRecompute, RankingStrategy};

/// Entry point to every core operation of the league.
///
/// Holds the connection pool, the tuning configuration and the ranking
/// strategy. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct LeagueService {
    pool: DbPool,
    config: AppConfig,
    ranking: Arc<dyn RankingStrategy>,
}

impl LeagueService {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            pool,
            config,
            ranking: Arc::new(FullRecompute),
        }
    }

    /// Opens (or creates) the database at `database_path` and makes sure the schema exists
    pub fn open(database_path: &str, config: AppConfig) -> Result<Self> {
        let pool = database::create_pool(database_path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::initialize_database(&mut conn)?;
        info!("Opened league database at {}", database_path);
        Ok(Self::new(pool, config))
    }

    pub fn with_ranking(mut self, ranking: Arc<dyn RankingStrategy>) -> Self {
        info!("Using {} rank recomputation", ranking.name());
        self.ranking = ranking;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn connection(&self) -> LeagueResult<DbConn> {
        Ok(self.pool.get()?)
    }

    pub fn create_user(
        &self,
        username: &str,
        is_staff: bool,
        gender: Option<Gender>,
        city: &str,
    ) -> LeagueResult<User> {
        let conn = self.connection()?;
        Ok(users::insert_user(&conn, username, is_staff, gender, city)?)
    }

    pub fn get_user(&self, user_id: UserId) -> LeagueResult<User> {
        let conn = self.connection()?;
        require_user(&conn, user_id)
    }
}

fn require_user(conn: &Connection, user_id: UserId) -> LeagueResult<User> {
    users::find_by_id(conn, user_id)?.ok_or(LeagueError::UserNotFound(user_id))
}

/// Administrative operations are reserved for staff accounts
fn require_staff(conn: &Connection, user_id: UserId) -> LeagueResult<User> {
    match users::find_by_id(conn, user_id)? {
        Some(user) if user.is_staff => Ok(user),
        _ => Err(LeagueError::Unauthorized(user_id)),
    }
}
