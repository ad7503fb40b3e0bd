use log::debug;

use super::types::RatingMap;
use crate::config::settings::RatingSettings;
use crate::domain::{Match, MatchState, PlayerId};

/// Calculates Elo ratings from the chronological history of completed
/// matches. The fold is path-dependent by design: replaying the same matches
/// in a different order gives different ratings.
pub fn compute_ratings(
    player_ids: &[PlayerId],
    matches: &[Match],
    settings: &RatingSettings,
) -> RatingMap {
    let mut ratings: RatingMap = player_ids
        .iter()
        .map(|id| (*id, settings.initial_rating))
        .collect();

    let history = chronological_completed(matches);
    debug!(
        "computing ratings for {} players over {} completed matches",
        ratings.len(),
        history.len()
    );

    for m in history {
        apply_match(&mut ratings, m, settings);
    }

    ratings
}

/// Expected score of the first player under the Elo model. Also drives the
/// outcome simulator's win-probability draw.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

/// Completed matches sorted by scheduled time. The sort is stable, so
/// matches sharing a timestamp keep the order the caller supplied them in.
fn chronological_completed(matches: &[Match]) -> Vec<&Match> {
    let mut history: Vec<&Match> = matches.iter().filter(|m| m.is_completed()).collect();
    history.sort_by_key(|m| m.scheduled_at());
    history
}

fn apply_match(ratings: &mut RatingMap, m: &Match, settings: &RatingSettings) {
    let MatchState::Completed {
        players: (p1, p2),
        score1,
        score2,
        ..
    } = &m.state
    else {
        return;
    };

    let r1 = rating_of(ratings, *p1, settings);
    let r2 = rating_of(ratings, *p2, settings);

    let expected1 = expected_score(r1, r2);
    let actual1 = if score1 > score2 { 1.0 } else { 0.0 };
    let delta = settings.k_factor * (actual1 - expected1);

    ratings.insert(*p1, r1 + delta);
    ratings.insert(*p2, r2 - delta);
}

pub fn rating_of(ratings: &RatingMap, player_id: PlayerId, settings: &RatingSettings) -> f64 {
    ratings
        .get(&player_id)
        .copied()
        .unwrap_or(settings.initial_rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;
    use chrono::{TimeZone, Utc};

    fn played(id: i64, p1: i64, p2: i64, s1: u32, s2: u32, hour: u32) -> Match {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap();
        Match::completed(id, Stage::Group(1), (p1, p2), s1, s2, Some(at))
    }

    #[test]
    fn unplayed_player_keeps_initial_rating() {
        let settings = RatingSettings::default();
        let ratings = compute_ratings(&[1, 2, 3], &[played(1, 1, 2, 5, 3, 10)], &settings);
        assert_eq!(ratings[&3], settings.initial_rating);
    }

    #[test]
    fn update_is_zero_sum() {
        let settings = RatingSettings::default();
        let ratings = compute_ratings(&[1, 2], &[played(1, 1, 2, 5, 3, 10)], &settings);
        let gain = ratings[&1] - settings.initial_rating;
        let loss = settings.initial_rating - ratings[&2];
        assert!((gain - loss).abs() < 1e-9);
        assert!(gain > 0.0);
        // Equal priors: the favourite assumption is 0.5, so the winner gains k/2.
        assert!((gain - settings.k_factor / 2.0).abs() < 1e-9);
    }

    #[test]
    fn replay_order_changes_outcome() {
        let settings = RatingSettings::default();
        // A beats B, then B beats A; ratings differ from the reversed order
        // because the second update sees a non-even expected score.
        let forward = compute_ratings(
            &[1, 2],
            &[played(1, 1, 2, 5, 0, 10), played(2, 2, 1, 5, 4, 12)],
            &settings,
        );
        let reversed = compute_ratings(
            &[1, 2],
            &[played(2, 2, 1, 5, 4, 10), played(1, 1, 2, 5, 0, 12)],
            &settings,
        );
        assert!((forward[&1] - reversed[&1]).abs() > 1e-6);
    }

    #[test]
    fn expected_score_is_symmetric() {
        assert!((expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
        let p = expected_score(1600.0, 1400.0);
        let q = expected_score(1400.0, 1600.0);
        assert!((p + q - 1.0).abs() < 1e-12);
        assert!(p > 0.75);
    }

    #[test]
    fn pending_matches_are_ignored() {
        use crate::domain::MatchSlot;
        let settings = RatingSettings::default();
        let pending = Match::pending(
            9,
            Stage::Group(1),
            (MatchSlot::Player(1), MatchSlot::Player(2)),
            None,
        );
        let ratings = compute_ratings(&[1, 2], &[pending], &settings);
        assert_eq!(ratings[&1], settings.initial_rating);
        assert_eq!(ratings[&2], settings.initial_rating);
    }
}
