pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod draw;
pub mod errors;
pub mod rating;
pub mod services;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::Cli;
use std::sync::Arc;

use crate::cli::Command;
use crate::config::settings::{database_path, AppConfig};
use crate::database::RatingFilter;
use crate::rating::ranking::strategy_by_name;
use crate::services::server::ServerService;
use crate::services::LeagueService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_service() -> Result<LeagueService> {
    LeagueService::open(&database_path(), AppConfig::new())
}

pub fn handle_serve(port: u16) -> Result<()> {
    let service = open_service()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = ServerService::new(port, service);
        server.run().await
    })
}

pub fn handle_init() -> Result<()> {
    open_service()?;
    log::info!("Database schema is ready at {}", database_path());
    Ok(())
}

pub fn handle_reset() -> Result<()> {
    let path = database_path();
    let pool = database::create_pool(&path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::reset_database(&mut conn)?;
    log::info!("Database at {} was reset", path);
    Ok(())
}

pub fn handle_rerank(strategy: &str) -> Result<()> {
    let ranking = strategy_by_name(strategy)
        .ok_or_else(|| anyhow!("Unknown ranking strategy '{}' (expected full or windowed)", strategy))?;
    let service = open_service()?.with_ranking(Arc::from(ranking));
    let written = service.recompute_ranks()?;
    println!("Rank positions written: {}", written);
    Ok(())
}

pub fn handle_leaderboard(limit: usize) -> Result<()> {
    let service = open_service()?;
    let filter = RatingFilter {
        limit: Some(limit),
        ..RatingFilter::default()
    };

    let rows = service.list_ratings(&filter)?;
    if rows.is_empty() {
        println!("No ratings yet");
        return Ok(());
    }

    println!("{:>4}  {:>8}  {:>6}  {:>6}  {:>6}  NTRP", "Rank", "User", "Points", "Played", "Win %");
    for row in rows {
        let rank = row
            .rank_position
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:>8}  {:>6}  {:>6}  {:>6.1}  {}",
            rank,
            row.user_id,
            row.points,
            row.matches_played,
            row.win_percentage(),
            row.ntrp_level
        );
    }
    Ok(())
}
