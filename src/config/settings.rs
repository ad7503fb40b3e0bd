pub struct RatingSettings {
    pub initial_rating: f64,
    pub k_factor: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            k_factor: 32.0,
        }
    }
}

/// Race-to targets per stage. Group play is short; the bracket gets longer
/// races the deeper it goes.
pub struct RaceSettings {
    pub group_race_to: u32,
    pub quarter_final_race_to: u32,
    pub semi_final_race_to: u32,
    pub final_race_to: u32,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            group_race_to: 5,
            quarter_final_race_to: 6,
            semi_final_race_to: 7,
            final_race_to: 9,
        }
    }
}

pub struct SimulationSettings {
    /// Total simulation budget for one group prediction. The per-trial count
    /// is this divided by the number of unplayed matches.
    pub total_iterations: u32,
    /// Fixed base seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            total_iterations: 10_000,
            seed: None,
        }
    }
}

pub struct AppConfig {
    pub rating: RatingSettings,
    pub races: RaceSettings,
    pub simulation: SimulationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            races: RaceSettings::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

// Configs are passed explicitly (Dependency Injection) rather than held
// in globals, so callers can run differently tuned computations side by side.
