use anyhow::Result;

use tennis_league::cli::Command;
use tennis_league::{
    handle_init, handle_leaderboard, handle_rerank, handle_reset, handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init => handle_init(),
        Command::Reset => handle_reset(),
        Command::Rerank { strategy } => handle_rerank(strategy),
        Command::Leaderboard { limit } => handle_leaderboard(*limit),
    }
}
