pub mod elo;
pub mod types;

pub use elo::{compute_ratings, expected_score, rating_of};
pub use types::{RatingMap, RatingValue};
