use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    pub baseline_rating: f64,
    pub k_factor: f64,
    /// Must be positive; checked when a config file is loaded
    pub half_life_days: f64,
    /// Share of each surface delta applied to the overall rating
    pub overall_bleed: f64,
    /// Results kept per player for recent form
    pub history_limit: usize,
    /// Reference date for recency weighting; latest match date when unset
    pub as_of: Option<NaiveDate>,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            baseline_rating: 1500.0,
            k_factor: 32.0,
            half_life_days: 730.0, // 2 years
            overall_bleed: 0.2,
            history_limit: 50,
            as_of: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSettings {
    pub form_window: usize,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self { form_window: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub bracket_sizes: Vec<usize>,
    pub default_trials: usize,
    pub seed: Option<u64>,
    pub upset_risk_threshold: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            bracket_sizes: vec![2, 4, 8, 16, 32, 64, 128],
            default_trials: 1000,
            seed: None,
            upset_risk_threshold: 0.65,
        }
    }
}

impl SimulationSettings {
    /// Single elimination needs a power of two
    pub fn supports(&self, bracket_size: usize) -> bool {
        bracket_size >= 2
            && bracket_size.is_power_of_two()
            && self.bracket_sizes.contains(&bracket_size)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub prediction: PredictionSettings,
    pub simulation: SimulationSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file; absent fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let half_life = self.rating.half_life_days;
        if !(half_life.is_finite() && half_life > 0.0) {
            bail!("rating.half_life_days must be a positive number of days, got {half_life}");
        }
        Ok(())
    }

    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::new()),
        }
    }
}
