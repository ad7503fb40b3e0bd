use std::collections::HashMap;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;

use super::outcome::simulate_match;
use crate::config::settings::AppConfig;
use crate::domain::{Group, Match, PlayerId};
use crate::rating::RatingMap;
use crate::standings;

/// Monte Carlo estimate of how a group finishes: for each player, the
/// probability of ending 1st and of ending in the top two. Both maps are
/// empty when every match with defined players is already played.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupPrediction {
    pub top1: HashMap<PlayerId, f64>,
    pub top2: HashMap<PlayerId, f64>,
}

/// Per-trial finish counters, merged across the rayon fan-out by summing.
#[derive(Debug, Default)]
struct FinishTally {
    first: HashMap<PlayerId, u64>,
    top_two: HashMap<PlayerId, u64>,
}

impl FinishTally {
    fn record(&mut self, table: &[standings::GroupStanding]) {
        if let Some(leader) = table.first() {
            *self.first.entry(leader.player_id).or_insert(0) += 1;
            *self.top_two.entry(leader.player_id).or_insert(0) += 1;
        }
        if let Some(runner_up) = table.get(1) {
            *self.top_two.entry(runner_up.player_id).or_insert(0) += 1;
        }
    }

    fn merge(mut self, other: FinishTally) -> FinishTally {
        for (player, count) in other.first {
            *self.first.entry(player).or_insert(0) += count;
        }
        for (player, count) in other.top_two {
            *self.top_two.entry(player).or_insert(0) += count;
        }
        self
    }
}

/// Repeatedly simulate the group's unplayed matches and re-aggregate the
/// table, tallying who finishes 1st / top-two.
///
/// The simulation budget `total_iterations` is divided by the number of
/// unplayed matches, so the wall-clock cost stays roughly constant however
/// many matches remain. Trials are independent: each uses the same fixed
/// rating map and, when a seed is configured, its own RNG derived from
/// `seed + trial index`, making results identical regardless of how rayon
/// schedules them.
pub fn predict_group(
    group: &Group,
    matches: &[Match],
    ratings: &RatingMap,
    config: &AppConfig,
) -> GroupPrediction {
    let completed: Vec<&Match> = matches.iter().filter(|m| m.is_completed()).collect();
    let unplayed: Vec<&Match> = matches
        .iter()
        .filter(|m| !m.is_completed() && m.has_defined_players())
        .collect();

    if unplayed.is_empty() || group.players.is_empty() {
        return GroupPrediction::default();
    }

    let trials = (config.simulation.total_iterations as usize / unplayed.len()).max(1);
    debug!(
        "predicting group {}: {} unplayed matches, {} trials",
        group.id,
        unplayed.len(),
        trials
    );

    let tally = (0..trials as u64)
        .into_par_iter()
        .fold(FinishTally::default, |mut tally, trial| {
            let mut rng = trial_rng(config.simulation.seed, trial);
            let table = run_trial(group, &completed, &unplayed, ratings, config, &mut rng);
            tally.record(&table);
            tally
        })
        .reduce(FinishTally::default, FinishTally::merge);

    let denominator = trials as f64;
    GroupPrediction {
        top1: to_probabilities(tally.first, denominator),
        top2: to_probabilities(tally.top_two, denominator),
    }
}

fn trial_rng(seed: Option<u64>, trial: u64) -> StdRng {
    match seed {
        Some(base) => StdRng::seed_from_u64(base.wrapping_add(trial)),
        None => StdRng::from_entropy(),
    }
}

/// One trial: draw a result for every unplayed match and rank the group
/// over the real results plus the simulated overlay. Ratings are not
/// updated mid-trial.
fn run_trial(
    group: &Group,
    completed: &[&Match],
    unplayed: &[&Match],
    ratings: &RatingMap,
    config: &AppConfig,
    rng: &mut StdRng,
) -> Vec<standings::GroupStanding> {
    let mut overlay: Vec<Match> = completed.iter().map(|m| (*m).clone()).collect();

    for m in unplayed {
        let Some((p1, p2)) = m.player_ids() else {
            continue;
        };
        let race_to = m.stage.race_to(&config.races);
        let (score1, score2) =
            simulate_match(p1, p2, race_to, ratings, &config.rating, rng);
        overlay.push(Match::completed(
            m.id,
            m.stage,
            (p1, p2),
            score1,
            score2,
            m.scheduled_at(),
        ));
    }

    standings::aggregate(group, &overlay)
}

fn to_probabilities(counts: HashMap<PlayerId, u64>, denominator: f64) -> HashMap<PlayerId, f64> {
    counts
        .into_iter()
        .map(|(player, count)| (player, count as f64 / denominator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchSlot, Player, Stage};

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            nickname: None,
        }
    }

    fn pair(id: i64, p1: PlayerId, p2: PlayerId) -> Match {
        Match::pending(
            id,
            Stage::Group(1),
            (MatchSlot::Player(p1), MatchSlot::Player(p2)),
            None,
        )
    }

    fn seeded_config(seed: u64) -> AppConfig {
        let mut config = AppConfig::new();
        config.simulation.seed = Some(seed);
        config
    }

    #[test]
    fn finished_group_predicts_nothing() {
        let group = Group {
            id: 1,
            name: "A".to_string(),
            players: vec![player(1, "Adam"), player(2, "Bartek")],
        };
        let matches = vec![Match::completed(1, Stage::Group(1), (1, 2), 5, 3, None)];
        let ratings = RatingMap::new();

        let prediction = predict_group(&group, &matches, &ratings, &seeded_config(1));
        assert!(prediction.top1.is_empty());
        assert!(prediction.top2.is_empty());
    }

    #[test]
    fn probabilities_stay_in_bounds() {
        let group = Group {
            id: 1,
            name: "A".to_string(),
            players: vec![player(1, "Adam"), player(2, "Bartek"), player(3, "Celina")],
        };
        let matches = vec![
            Match::completed(1, Stage::Group(1), (1, 2), 5, 2, None),
            pair(2, 1, 3),
            pair(3, 2, 3),
        ];
        let ratings = RatingMap::from([(1, 1600.0), (2, 1500.0), (3, 1400.0)]);

        let prediction = predict_group(&group, &matches, &ratings, &seeded_config(5));
        for p in &group.players {
            let top1 = prediction.top1.get(&p.id).copied().unwrap_or(0.0);
            let top2 = prediction.top2.get(&p.id).copied().unwrap_or(0.0);
            assert!((0.0..=1.0).contains(&top1));
            assert!((0.0..=1.0).contains(&top2));
            assert!(top1 <= top2);
        }
    }

    #[test]
    fn equal_ratings_split_the_last_match_evenly() {
        // Two unbeaten players of identical rating meet in the only
        // remaining match: each should take 1st about half the time.
        let group = Group {
            id: 1,
            name: "A".to_string(),
            players: vec![player(1, "Adam"), player(2, "Bartek"), player(3, "Celina")],
        };
        let matches = vec![
            Match::completed(1, Stage::Group(1), (1, 3), 5, 1, None),
            Match::completed(2, Stage::Group(1), (2, 3), 5, 1, None),
            pair(3, 1, 2),
        ];
        let ratings = RatingMap::from([(1, 1500.0), (2, 1500.0), (3, 1400.0)]);

        let mut config = seeded_config(1234);
        config.simulation.total_iterations = 10_000;

        let prediction = predict_group(&group, &matches, &ratings, &config);
        let p1 = prediction.top1[&1];
        let p2 = prediction.top1[&2];
        assert!((p1 - p2).abs() < 0.03, "p1={p1} p2={p2}");
        assert!((p1 + p2 - 1.0).abs() < 1e-9);
        // Celina cannot finish first in any scenario.
        assert!(!prediction.top1.contains_key(&3));
        // Both meet-winners are guaranteed top-two.
        assert!((prediction.top2[&1] + prediction.top2[&2] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_seed_reproduces_results() {
        let group = Group {
            id: 1,
            name: "A".to_string(),
            players: vec![player(1, "Adam"), player(2, "Bartek"), player(3, "Celina")],
        };
        let matches = vec![pair(1, 1, 2), pair(2, 1, 3), pair(3, 2, 3)];
        let ratings = RatingMap::from([(1, 1550.0), (2, 1500.0), (3, 1450.0)]);
        let config = seeded_config(99);

        let a = predict_group(&group, &matches, &ratings, &config);
        let b = predict_group(&group, &matches, &ratings, &config);
        assert_eq!(a, b);
    }
}
