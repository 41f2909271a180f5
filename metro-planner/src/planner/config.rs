//! Planner configuration.
//!
//! Defaults reproduce the network's published operating rules. Any field
//! can be overridden from a JSON file; omitted fields keep their defaults.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;

use crate::domain::{ClockTime, minutes};

use super::fare::{FareError, FareSlab, FareTable};

/// Upper bound for every minute-valued setting: one service day.
const MAX_SETTING_MINS: i64 = 24 * 60;

/// Errors loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for a configuration
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The values are inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The fare table is malformed
    #[error("invalid fare table: {0}")]
    Fare(#[from] FareError),
}

/// A half-open `[start, end)` window of peak-frequency service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PeakWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl PeakWindow {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Returns true if `time` is inside the window.
    pub fn contains(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// How departures from the two ends of a line relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum DirectionSchedule {
    /// Both termini dispatch on the same timetable.
    #[default]
    Shared,
    /// Trains towards the line start run this many minutes behind.
    Staggered { minutes: i64 },
}

/// Configuration for journey planning and departure boards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// First departure of the day.
    pub service_start: ClockTime,

    /// Last departure of the day.
    pub service_end: ClockTime,

    /// Windows running at peak frequency.
    pub peak_windows: Vec<PeakWindow>,

    /// Headway inside peak windows (minutes).
    pub peak_freq_mins: i64,

    /// Headway outside peak windows (minutes).
    pub offpeak_freq_mins: i64,

    /// Time a train stands at each station (minutes).
    pub dwell_mins: f64,

    /// Time to change lines (minutes).
    pub interchange_mins: f64,

    /// Distance-based fare table.
    pub fare_slabs: FareTable,

    pub direction_schedule: DirectionSchedule,

    /// Maximum arrivals listed per direction on a departure board.
    pub max_board_results: usize,

    /// Symbol printed before fares.
    pub currency: String,
}

impl PlannerConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check the values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let headways = 1..=MAX_SETTING_MINS;
        if !headways.contains(&self.peak_freq_mins) || !headways.contains(&self.offpeak_freq_mins) {
            return Err(invalid("frequencies must be between 1 and 1440 minutes"));
        }
        if self.service_end < self.service_start {
            return Err(invalid("service_end is before service_start"));
        }
        if let Some(window) = self.peak_windows.iter().find(|w| w.end <= w.start) {
            return Err(ConfigError::Invalid(format!(
                "peak window {}-{} ends before it starts",
                window.start, window.end
            )));
        }
        let span = 0.0..=MAX_SETTING_MINS as f64;
        if !span.contains(&self.dwell_mins) {
            return Err(invalid("dwell_mins must be between 0 and 1440"));
        }
        if !span.contains(&self.interchange_mins) {
            return Err(invalid("interchange_mins must be between 0 and 1440"));
        }
        if let DirectionSchedule::Staggered { minutes } = self.direction_schedule {
            if !(0..=MAX_SETTING_MINS).contains(&minutes) {
                return Err(invalid("staggered minutes must be between 0 and 1440"));
            }
        }
        self.fare_slabs.validate()?;
        Ok(())
    }

    /// Returns true if `time` falls within `[service_start, service_end]`.
    pub fn in_service(&self, time: ClockTime) -> bool {
        self.service_start <= time && time <= self.service_end
    }

    /// Returns true if `time` falls in any peak window.
    pub fn is_peak(&self, time: ClockTime) -> bool {
        self.peak_windows.iter().any(|w| w.contains(time))
    }

    /// Returns the peak headway as a Duration.
    pub fn peak_freq(&self) -> Duration {
        Duration::minutes(self.peak_freq_mins)
    }

    /// Returns the off-peak headway as a Duration.
    pub fn offpeak_freq(&self) -> Duration {
        Duration::minutes(self.offpeak_freq_mins)
    }

    /// Returns the station dwell as a Duration.
    pub fn dwell(&self) -> Duration {
        minutes(self.dwell_mins)
    }

    /// Returns the line-change penalty as a Duration.
    pub fn interchange(&self) -> Duration {
        minutes(self.interchange_mins)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            service_start: ClockTime::from_minutes(6 * 60),
            service_end: ClockTime::from_minutes(23 * 60),
            peak_windows: vec![
                PeakWindow::new(
                    ClockTime::from_minutes(8 * 60),
                    ClockTime::from_minutes(10 * 60),
                ),
                PeakWindow::new(
                    ClockTime::from_minutes(17 * 60),
                    ClockTime::from_minutes(19 * 60),
                ),
            ],
            peak_freq_mins: 4,
            offpeak_freq_mins: 8,
            dwell_mins: 0.5,
            interchange_mins: 2.0,
            fare_slabs: FareTable::new(vec![
                FareSlab::up_to(2.0, 10),
                FareSlab::up_to(5.0, 20),
                FareSlab::up_to(12.0, 30),
                FareSlab::up_to(21.0, 40),
                FareSlab::up_to(32.0, 50),
                FareSlab::beyond(60),
            ]),
            direction_schedule: DirectionSchedule::Shared,
            max_board_results: 6,
            currency: "₹".to_string(),
        }
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid(reason.to_string())
}
