//! Journey planner.
//!
//! This module answers the rider's two questions:
//!
//! - "What is the fastest way from A to B if I set off at T?" Route search
//!   picks the fastest direct or single-transfer route, then the itinerary
//!   calculator times it against the departure schedule and prices it.
//! - "When are the next trains at this station?" The departure board lists
//!   upcoming arrivals in both directions.

mod board;
mod config;
mod error;
mod fare;
mod itinerary;
mod schedule;
mod search;


pub use board::{BoardDirection, DepartureBoard, departure_board};
pub use config::{ConfigError, DirectionSchedule, PeakWindow, PlannerConfig};
pub use error::PlanError;
pub use fare::{FareError, FareSlab, FareTable};
pub use itinerary::{Itinerary, ItineraryLeg, Waypoint, compute_itinerary};
pub use schedule::{DepartureSource, FrequencySchedule, generate_departures, next_train};
pub use search::find_route;

use tracing::debug;

use crate::dataset::{Dataset, match_line, match_station, match_station_on_line};
use crate::domain::ClockTime;

/// A journey query as typed by the rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyRequest {
    /// Source station text (exact or prefix).
    pub from: String,
    /// Destination station text (exact or prefix).
    pub to: String,
    /// Time the rider is ready to travel.
    pub at: ClockTime,
}

impl JourneyRequest {
    /// Create a new journey request.
    pub fn new(from: impl Into<String>, to: impl Into<String>, at: ClockTime) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            at,
        }
    }

    /// Create a request from a "HH:MM" departure time.
    pub fn parse(from: impl Into<String>, to: impl Into<String>, at: &str) -> Result<Self, PlanError> {
        Ok(Self::new(from, to, ClockTime::parse_hhmm(at)?))
    }
}

/// A departure board query as typed by the rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRequest {
    pub line: String,
    pub station: String,
    pub at: ClockTime,
}

impl BoardRequest {
    /// Create a new board request.
    pub fn new(line: impl Into<String>, station: impl Into<String>, at: ClockTime) -> Self {
        Self {
            line: line.into(),
            station: station.into(),
            at,
        }
    }
}

/// Journey planner over a loaded dataset.
pub struct Planner<'a, S: DepartureSource> {
    dataset: &'a Dataset,
    departures: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: DepartureSource> Planner<'a, S> {
    /// Create a new planner.
    pub fn new(dataset: &'a Dataset, departures: &'a S, config: &'a PlannerConfig) -> Self {
        Self {
            dataset,
            departures,
            config,
        }
    }

    /// Plan a journey.
    ///
    /// Service hours are checked before any station is looked up.
    pub fn plan(&self, request: &JourneyRequest) -> Result<Itinerary, PlanError> {
        itinerary::check_service_hours(self.config, request.at)?;

        let from = match_station(self.dataset, &request.from)
            .ok_or_else(|| PlanError::StationNotFound(request.from.clone()))?;
        let to = match_station(self.dataset, &request.to)
            .ok_or_else(|| PlanError::StationNotFound(request.to.clone()))?;
        debug!(from, to, at = %request.at, "planning journey");

        let route = find_route(self.dataset, from, to, self.config)?;
        compute_itinerary(self.dataset, &route, request.at, self.departures, self.config)
    }

    /// List the next arrivals at a station.
    pub fn board(&self, request: &BoardRequest) -> Result<DepartureBoard, PlanError> {
        let line_id = match_line(self.dataset, &request.line)
            .ok_or_else(|| PlanError::LineNotFound(request.line.clone()))?;
        let line = self
            .dataset
            .line(line_id)
            .ok_or_else(|| PlanError::LineNotFound(request.line.clone()))?;
        let station_idx = match_station_on_line(line, &request.station)
            .ok_or_else(|| PlanError::StationNotFound(request.station.clone()))?;
        debug!(line = line.name(), station_idx, at = %request.at, "building board");

        departure_board(
            self.dataset,
            line_id,
            station_idx,
            request.at,
            self.departures,
            self.config,
        )
    }
}
