pub mod outcome;
pub mod predict;

pub use outcome::simulate_match;
pub use predict::{GroupPrediction, predict_group};
