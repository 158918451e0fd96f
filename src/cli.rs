use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "tennis-league tournament and rating engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema if it does not exist
    Init,
    /// Drop every table and recreate the schema
    Reset,
    /// Recompute leaderboard rank positions
    Rerank {
        /// Ranking strategy: full or windowed
        #[arg(short, long, default_value = "full")]
        strategy: String,
    },
    /// Print the top of the leaderboard
    Leaderboard {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}
