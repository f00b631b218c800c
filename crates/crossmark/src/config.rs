//! Game and computer-opponent configuration.
//!
//! Both records are read-only once a session is built. They can be
//! loaded from TOML; absent keys fall back to the built-in defaults.

use crate::error::ConfigError;
use crate::types::Mark;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Per-tier probabilities used by the move heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    /// Take an immediate win.
    pub take_win: f64,
    /// Block the opponent's immediate win.
    pub block_win: f64,
    /// Take the empty center.
    pub take_center: f64,
    /// Favour corners in the positional draw.
    pub take_corner: f64,
    /// Play an own fork.
    pub take_fork: f64,
    /// Block an opponent fork.
    pub block_fork: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            take_win: 0.88,
            block_win: 0.80,
            take_center: 0.72,
            take_corner: 0.70,
            take_fork: 0.45,
            block_fork: 0.40,
        }
    }
}

impl Rates {
    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("take_win", self.take_win),
            ("block_win", self.block_win),
            ("take_center", self.take_center),
            ("take_corner", self.take_corner),
            ("take_fork", self.take_fork),
            ("block_fork", self.block_fork),
        ]
    }
}

/// Named difficulty bundle for the computer opponent.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AiProfile {
    /// Profile name.
    name: String,
    /// Human-readable difficulty.
    difficulty: String,
    /// Lower bound of the thinking delay in milliseconds.
    delay_min_ms: u64,
    /// Upper bound of the thinking delay in milliseconds.
    delay_max_ms: u64,
    /// Chance that a positional move favours sides over corners.
    mistake_chance: f64,
    /// Tier probabilities.
    rates: Rates,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self::smart()
    }
}

impl AiProfile {
    /// The "Smart-1.5" profile: slightly easy, with a short thinking delay.
    pub fn smart() -> Self {
        Self {
            name: "Smart-1.5".to_string(),
            difficulty: "Slightly Easy".to_string(),
            delay_min_ms: 520,
            delay_max_ms: 920,
            mistake_chance: 0.16,
            rates: Rates::default(),
        }
    }

    /// Creates a profile from explicit values.
    pub fn new(
        name: impl Into<String>,
        difficulty: impl Into<String>,
        delay: (u64, u64),
        rates: Rates,
        mistake_chance: f64,
    ) -> Self {
        Self {
            name: name.into(),
            difficulty: difficulty.into(),
            delay_min_ms: delay.0,
            delay_max_ms: delay.1,
            mistake_chance,
            rates,
        }
    }

    /// Thinking delay bounds.
    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.delay_min_ms),
            Duration::from_millis(self.delay_max_ms),
        )
    }

    /// Checks probabilities lie in `[0, 1]` and the delay range is ordered.
    #[instrument(skip(self), fields(profile = %self.name))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = self
            .rates
            .named()
            .into_iter()
            .chain([("mistake_chance", self.mistake_chance)]);
        for (key, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::new(format!(
                    "{} must be within [0, 1], got {}",
                    key, value
                )));
            }
        }
        if self.delay_min_ms > self.delay_max_ms {
            return Err(ConfigError::new(format!(
                "delay_min_ms ({}) exceeds delay_max_ms ({})",
                self.delay_min_ms, self.delay_max_ms
            )));
        }
        Ok(())
    }
}

/// Match-wide settings.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Score that ends the match.
    win_points: u32,
    /// Delay before end-of-round controls accept input, in milliseconds.
    end_screen_arm_ms: u64,
    /// Mark that opens the first round of every match.
    first_mark: Mark,
    /// Computer opponent profile.
    profile: AiProfile,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_points: 3,
            end_screen_arm_ms: 220,
            first_mark: Mark::X,
            profile: AiProfile::smart(),
        }
    }
}

impl GameConfig {
    /// Returns a copy using `profile` for the computer opponent.
    pub fn with_profile(mut self, profile: AiProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Returns a copy with a different win threshold.
    pub fn with_win_points(mut self, win_points: u32) -> Self {
        self.win_points = win_points;
        self
    }

    /// End-screen arm delay.
    pub fn end_screen_arm(&self) -> Duration {
        Duration::from_millis(self.end_screen_arm_ms)
    }

    /// Parses configuration from TOML text and validates it.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(profile = %config.profile.name, win_points = config.win_points, "Config loaded");
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }

    /// Checks the threshold is positive and the profile is well formed.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_points == 0 {
            return Err(ConfigError::new("win_points must be at least 1"));
        }
        self.profile.validate()
    }
}
