pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod qualification;
pub mod rating;
pub mod services;
pub mod simulation;
pub mod snapshot;
pub mod standings;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::domain::GroupId;
use crate::services::analytics::AnalyticsService;
use crate::snapshot::Tournament;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_ratings(snapshot_path: &Path) -> Result<()> {
    let tournament = load_tournament(snapshot_path)?;
    let service = AnalyticsService::new(AppConfig::new());
    let ratings = service.ratings(&tournament);

    let mut rows: Vec<_> = tournament
        .players
        .iter()
        .map(|p| (p.name.as_str(), ratings.get(&p.id).copied().unwrap_or(0.0)))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (rank, (name, rating)) in rows.iter().enumerate() {
        println!("{:>3}. {:<24} {:>7.1}", rank + 1, name, rating);
    }
    Ok(())
}

pub fn handle_standings(snapshot_path: &Path, group: GroupId) -> Result<()> {
    let tournament = load_tournament(snapshot_path)?;
    let service = AnalyticsService::new(AppConfig::new());
    let table = service.group_standings(&tournament, group)?;

    println!(
        "{:>3} {:<24} {:>3} {:>3} {:>5} {:>4} {:>6} {:>6}",
        "#", "player", "W", "L", "racks", "pts", "p1st", "ptop2"
    );
    for standing in &table {
        println!(
            "{:>3} {:<24} {:>3} {:>3} {:>2}:{:<2} {:>4} {:>6} {:>6}",
            standing.group_position,
            standing.player_name,
            standing.match_wins,
            standing.match_losses,
            standing.rack_wins,
            standing.rack_losses,
            standing.points,
            format_prob(standing.top1_prob),
            format_prob(standing.top2_prob),
        );
    }
    Ok(())
}

pub fn handle_qualifiers(snapshot_path: &Path, slots: usize) -> Result<()> {
    let tournament = load_tournament(snapshot_path)?;
    let service = AnalyticsService::new(AppConfig::new());
    let qualifiers = service.qualifiers(&tournament, slots)?;

    for q in &qualifiers {
        println!(
            "seed {:>2}  {:<24} {} pts, {:+} racks",
            q.seed,
            q.standing.player_name,
            q.standing.points,
            q.standing.rack_difference(),
        );
    }
    Ok(())
}

pub fn handle_predict(
    snapshot_path: &Path,
    group: GroupId,
    iterations: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let tournament = load_tournament(snapshot_path)?;

    let mut config = AppConfig::new();
    if let Some(iterations) = iterations {
        config.simulation.total_iterations = iterations;
    }
    config.simulation.seed = seed;

    let service = AnalyticsService::new(config);
    let prediction = service.predict(&tournament, group)?;
    if prediction.top1.is_empty() {
        println!("group {group} is already decided; nothing to predict");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

fn load_tournament(path: &Path) -> Result<Tournament> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let parsed: snapshot::TournamentSnapshot =
        serde_json::from_str(&raw).context("Failed to parse tournament snapshot")?;
    snapshot::validate(parsed).context("Invalid tournament snapshot")
}

fn format_prob(prob: Option<f64>) -> String {
    match prob {
        Some(p) => format!("{:.0}%", p * 100.0),
        None => "-".to_string(),
    }
}
