use rand::Rng;

use crate::config::settings::RatingSettings;
use crate::domain::PlayerId;
use crate::rating::{self, RatingMap};

/// Draw one random result for a match between two rated players.
///
/// The winner is decided by a single uniform draw against the Elo expected
/// score; the winner takes `race_to` racks and the loser's rack count is
/// drawn uniformly from `[0, race_to - 1]`. The loser-score distribution is
/// a fixed implementation choice: qualification only depends on win/loss and
/// rack differential, but tests pin this distribution so it must not change
/// silently.
pub fn simulate_match<R: Rng>(
    player1: PlayerId,
    player2: PlayerId,
    race_to: u32,
    ratings: &RatingMap,
    settings: &RatingSettings,
    rng: &mut R,
) -> (u32, u32) {
    let r1 = rating::rating_of(ratings, player1, settings);
    let r2 = rating::rating_of(ratings, player2, settings);
    let p1_win_prob = rating::expected_score(r1, r2);

    let player1_wins = rng.gen_range(0.0..1.0) < p1_win_prob;
    let loser_score = rng.gen_range(0..race_to);

    if player1_wins {
        (race_to, loser_score)
    } else {
        (loser_score, race_to)
    }
}
