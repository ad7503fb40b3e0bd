use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::GroupId;

#[derive(Parser, Debug)]
#[command(author, version, about = "pool league analytics engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Elo ratings from the full match history
    Ratings {
        /// Tournament snapshot (JSON)
        snapshot: PathBuf,
    },
    /// Ranked table for one group, with forecast probabilities while the
    /// group is unfinished
    Standings {
        /// Tournament snapshot (JSON)
        snapshot: PathBuf,
        /// Group id
        #[arg(short, long)]
        group: GroupId,
    },
    /// Seeded knockout field across all groups
    Qualifiers {
        /// Tournament snapshot (JSON)
        snapshot: PathBuf,
        /// Knockout bracket size
        #[arg(short, long, default_value_t = 8)]
        slots: usize,
    },
    /// Monte Carlo forecast of a group's final table
    Predict {
        /// Tournament snapshot (JSON)
        snapshot: PathBuf,
        /// Group id
        #[arg(short, long)]
        group: GroupId,
        /// Total simulation budget
        #[arg(short, long)]
        iterations: Option<u32>,
        /// Fixed seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}
