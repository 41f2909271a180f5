//! Departure schedules.
//!
//! Trains leave each terminus at a fixed headway that tightens inside peak
//! windows. A train's arrival at a station is its terminus departure plus
//! the station's offset from that terminus.

use chrono::Duration;

use crate::domain::{ClockTime, Direction, LineId};

use super::config::{DirectionSchedule, PeakWindow, PlannerConfig};

/// Generate the day's departures from a terminus.
///
/// Starting at `service_start`, emit the current time and advance by
/// `peak_freq` inside any peak window or `offpeak_freq` otherwise, until the
/// time passes `service_end`. A departure exactly at `service_end` is kept.
///
/// Non-positive headways yield only the first departure.
pub fn generate_departures(
    service_start: ClockTime,
    service_end: ClockTime,
    peak_windows: &[PeakWindow],
    peak_freq: Duration,
    offpeak_freq: Duration,
) -> Vec<ClockTime> {
    let mut departures = Vec::new();
    let mut current = service_start;

    while current <= service_end {
        departures.push(current);
        let step = if peak_windows.iter().any(|w| w.contains(current)) {
            peak_freq
        } else {
            offpeak_freq
        };
        if step <= Duration::zero() {
            break;
        }
        current = current + step;
    }

    departures
}

/// The first train reaching a station at or after `ready`.
///
/// `departures` must be in ascending order; each train reaches the station
/// `offset` after leaving its terminus.
pub fn next_train(departures: &[ClockTime], offset: Duration, ready: ClockTime) -> Option<ClockTime> {
    let idx = departures.partition_point(|&dep| dep + offset < ready);
    departures.get(idx).map(|&dep| dep + offset)
}

/// Supplies terminus departures for a line and direction.
///
/// This abstraction allows the planner to be tested with fixed timetables.
pub trait DepartureSource {
    /// Ascending departures from the terminus trains in `direction` start at.
    fn departures(&self, line: LineId, direction: Direction) -> &[ClockTime];
}

/// Frequency-based departures shared by every line.
#[derive(Debug, Clone)]
pub struct FrequencySchedule {
    towards_end: Vec<ClockTime>,
    towards_start: Vec<ClockTime>,
}

impl FrequencySchedule {
    /// Build the day's departures from `config`.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let generate = |start: ClockTime| {
            generate_departures(
                start,
                config.service_end,
                &config.peak_windows,
                config.peak_freq(),
                config.offpeak_freq(),
            )
        };

        let towards_end = generate(config.service_start);
        let towards_start = match config.direction_schedule {
            DirectionSchedule::Shared => towards_end.clone(),
            DirectionSchedule::Staggered { minutes } => {
                generate(config.service_start + Duration::minutes(minutes))
            }
        };

        Self {
            towards_end,
            towards_start,
        }
    }
}

impl DepartureSource for FrequencySchedule {
    fn departures(&self, _line: LineId, direction: Direction) -> &[ClockTime] {
        match direction {
            Direction::TowardsEnd => &self.towards_end,
            Direction::TowardsStart => &self.towards_start,
        }
    }
}
