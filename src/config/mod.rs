pub mod settings;

pub use settings::{AppConfig, RaceSettings, RatingSettings, SimulationSettings};
