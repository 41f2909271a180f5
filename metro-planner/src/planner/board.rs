//! Next arrivals at a station, in both directions.

use tracing::debug;

use crate::dataset::Dataset;
use crate::domain::{ClockTime, Direction, LineId};

use super::config::PlannerConfig;
use super::error::PlanError;
use super::schedule::DepartureSource;

/// Arrivals for one direction of travel.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardDirection {
    pub direction: Direction,
    /// The terminus trains are heading for.
    pub towards: String,
    pub arrivals: Vec<ClockTime>,
}

/// Upcoming arrivals at one station of one line.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureBoard {
    /// Display name of the line.
    pub line: String,
    pub station: String,
    pub requested: ClockTime,
    /// The time arrivals are listed from; the service start if the request
    /// came before it.
    pub from: ClockTime,
    pub service_not_started: bool,
    pub directions: Vec<BoardDirection>,
}

/// List the next arrivals at `station_idx` on `line`.
///
/// # Errors
///
/// [`PlanError::OutsideServiceHours`] if `now` is after the last departure.
pub fn departure_board<S: DepartureSource>(
    dataset: &Dataset,
    line_id: LineId,
    station_idx: usize,
    now: ClockTime,
    departures: &S,
    config: &PlannerConfig,
) -> Result<DepartureBoard, PlanError> {
    let line = dataset
        .line(line_id)
        .ok_or_else(|| PlanError::LineNotFound(line_id.to_string()))?;
    let station = line
        .station(station_idx)
        .ok_or_else(|| PlanError::StationNotFound(format!("#{station_idx} on {}", line.name())))?;

    if now > config.service_end {
        return Err(PlanError::OutsideServiceHours {
            requested: now,
            start: config.service_start,
            end: config.service_end,
        });
    }
    let service_not_started = now < config.service_start;
    let from = now.max(config.service_start);

    let mut directions = Vec::with_capacity(2);
    for direction in [Direction::TowardsEnd, Direction::TowardsStart] {
        let Some(offset) = line.offset_in_direction(station_idx, direction) else {
            continue;
        };
        let arrivals: Vec<ClockTime> = departures
            .departures(line_id, direction)
            .iter()
            .map(|&dep| dep + offset)
            .filter(|&arrival| config.in_service(arrival) && arrival >= from)
            .take(config.max_board_results)
            .collect();

        directions.push(BoardDirection {
            direction,
            towards: line
                .terminus(direction)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            arrivals,
        });
    }

    debug!(
        line = line.name(),
        station = %station.name,
        from = %from,
        service_not_started,
        "built departure board"
    );

    Ok(DepartureBoard {
        line: line.display_name(),
        station: station.name.clone(),
        requested: now,
        from,
        service_not_started,
        directions,
    })
}
