use anyhow::Result;

use pool_league_analytics::cli::Command;
use pool_league_analytics::{
    handle_predict, handle_qualifiers, handle_ratings, handle_standings, interpret,
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
        Command::Ratings { snapshot } => handle_ratings(snapshot),
        Command::Standings { snapshot, group } => handle_standings(snapshot, *group),
        Command::Qualifiers { snapshot, slots } => handle_qualifiers(snapshot, *slots),
        Command::Predict {
            snapshot,
            group,
            iterations,
            seed,
        } => handle_predict(snapshot, *group, *iterations, *seed),
    }
}
