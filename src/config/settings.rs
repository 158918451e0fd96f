use crate::domain::Points;

pub const DEFAULT_DATABASE_PATH: &str = "tennis_league.db";

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub starting_points: Points,
    pub win_delta: Points,
    pub loss_delta: Points,
    pub points_floor: Points,
    pub default_ntrp_level: &'static str,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            starting_points: 1000,
            win_delta: 25,
            loss_delta: -10,
            points_floor: 0,
            default_ntrp_level: "3.0",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawSettings {
    pub min_participants: usize,
    /// Pair seeded participants top against bottom instead of shuffling everyone
    pub honor_seeds: bool,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            min_participants: 8,
            honor_seeds: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReferralSettings {
    pub default_bonus: i64,
}

impl Default for ReferralSettings {
    fn default() -> Self {
        Self { default_bonus: 500 }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub draw: DrawSettings,
    pub referral: ReferralSettings,
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
            draw: DrawSettings::default(),
            referral: ReferralSettings::default(),
        }
    }
}

pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string())
}
