use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Surface;

#[derive(Parser, Debug)]
#[command(author, version, about = "Surface-aware tennis Elo ratings and draw simulation")]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DataArgs {
    /// Match CSV files (ATP/WTA layout), repeated or comma-separated
    #[arg(long = "csv", global = true, value_delimiter = ',')]
    pub csv: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Show the highest rated players on a surface
    Ratings {
        #[arg(short, long, value_parser = parse_surface, default_value = "hard")]
        surface: Surface,
        /// Number of players to list
        #[arg(short, long, default_value_t = 20)]
        top: usize,
    },
    /// List every player in the match files
    Players,
    /// Ratings, recent form and surface breakdown of one player
    Profile {
        player: String,
        #[arg(short, long, value_parser = parse_surface, default_value = "hard")]
        surface: Surface,
    },
    /// Forecast a single match
    Predict {
        #[arg(long = "player-a")]
        player_a: String,
        #[arg(long = "player-b")]
        player_b: String,
        #[arg(short, long, value_parser = parse_surface)]
        surface: Surface,
    },
    /// Simulate a single-elimination draw
    Simulate {
        /// Comma-separated draw in bracket order; `bye` marks an empty slot
        #[arg(long, value_delimiter = ',')]
        players: Vec<String>,
        #[arg(short, long, value_parser = parse_surface)]
        surface: Surface,
        /// Number of trials (configured default when omitted)
        #[arg(short, long)]
        trials: Option<usize>,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_surface(s: &str) -> Result<Surface, String> {
    s.parse().map_err(|e: crate::errors::ValidationError| e.to_string())
}
