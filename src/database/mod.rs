pub mod connection;
pub mod matches;
pub mod models;
pub mod participants;
pub mod rating_history;
pub mod ratings;
pub mod referrals;
pub mod score_reports;
pub mod setup;
pub mod tournaments;
pub mod users;

pub use connection::{begin_write, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
