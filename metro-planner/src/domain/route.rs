//! Route types.
//!
//! A `Route` is the untimed answer to "how do I get from A to B": one leg on
//! a single line, or two legs joined at a transfer point. Timing against the
//! departure schedule happens later, when the route becomes an itinerary.

use std::fmt;

use chrono::Duration;

use super::{Direction, DomainError, Line, LineId};

/// Where a rider changes lines.
///
/// Usually the same station on both lines; an interchange edge can join two
/// differently-named stations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferPoint {
    /// Station on the first line.
    pub from: String,
    /// Station on the second line.
    pub to: String,
}

impl TransferPoint {
    /// A transfer within one station.
    pub fn same_station(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            from: name.clone(),
            to: name,
        }
    }

    /// A transfer between two linked stations.
    pub fn linked(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns true if the rider stays in the same station.
    pub fn is_same_station(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for TransferPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_same_station() {
            f.write_str(&self.from)
        } else {
            write!(f, "{} / {}", self.from, self.to)
        }
    }
}

/// One ride on one line.
///
/// # Invariants
///
/// - Both indices are valid stations of the line
/// - `path` runs from the boarding station to the alighting station inclusive
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    line: LineId,
    from_idx: usize,
    to_idx: usize,
    path: Vec<String>,
    ride_time: Duration,
    distance_km: f64,
}

impl RouteLeg {
    /// Construct a leg between two station positions on `line`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either index is out of range for the line.
    pub fn new(
        id: LineId,
        line: &Line,
        from_idx: usize,
        to_idx: usize,
        dwell: Duration,
    ) -> Result<Self, DomainError> {
        let ride_time = line
            .ride_time(from_idx, to_idx, dwell)
            .ok_or(DomainError::InvalidLeg("station index out of range"))?;
        let distance_km = line
            .offsets()
            .distance_between(from_idx, to_idx)
            .ok_or(DomainError::InvalidLeg("station index out of range"))?;

        Ok(Self {
            line: id,
            from_idx,
            to_idx,
            path: line.path(from_idx, to_idx),
            ride_time,
            distance_km,
        })
    }

    /// The line ridden.
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Boarding station position on the line.
    pub fn from_idx(&self) -> usize {
        self.from_idx
    }

    /// Alighting station position on the line.
    pub fn to_idx(&self) -> usize {
        self.to_idx
    }

    /// Boarding station name.
    pub fn from_name(&self) -> &str {
        &self.path[0]
    }

    /// Alighting station name.
    pub fn to_name(&self) -> &str {
        &self.path[self.path.len() - 1]
    }

    /// Direction of travel.
    pub fn direction(&self) -> Direction {
        Direction::between(self.from_idx, self.to_idx)
    }

    /// Stations passed through, boarding and alighting included.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Number of station-to-station hops.
    pub fn hops(&self) -> usize {
        self.from_idx.abs_diff(self.to_idx)
    }

    /// Riding time including intermediate dwells.
    pub fn ride_time(&self) -> Duration {
        self.ride_time
    }

    /// Track distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

/// Shape of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// A single line.
    Direct,
    /// Two lines joined at one transfer point.
    Transfer { at: TransferPoint },
}

/// A direct or single-transfer route from source to destination.
///
/// # Invariants
///
/// - One leg for a direct route, two for a transfer route
/// - The first leg ends at the transfer point and the second starts there
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    kind: RouteKind,
    legs: Vec<RouteLeg>,
    travel_time: Duration,
}

impl Route {
    /// A route on one line.
    pub fn direct(leg: RouteLeg) -> Self {
        let travel_time = leg.ride_time();
        Self {
            kind: RouteKind::Direct,
            legs: vec![leg],
            travel_time,
        }
    }

    /// A route changing lines once.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the legs don't meet at `at`.
    pub fn transfer(
        first: RouteLeg,
        at: TransferPoint,
        second: RouteLeg,
        interchange_penalty: Duration,
    ) -> Result<Self, DomainError> {
        if first.to_name() != at.from {
            return Err(DomainError::LegsNotConnected(
                first.to_name().to_string(),
                at.from.clone(),
            ));
        }
        if second.from_name() != at.to {
            return Err(DomainError::LegsNotConnected(
                at.to.clone(),
                second.from_name().to_string(),
            ));
        }

        let travel_time = first.ride_time() + interchange_penalty + second.ride_time();
        Ok(Self {
            kind: RouteKind::Transfer { at },
            legs: vec![first, second],
            travel_time,
        })
    }

    /// Direct or transfer.
    pub fn kind(&self) -> &RouteKind {
        &self.kind
    }

    /// Returns true for a single-line route.
    pub fn is_direct(&self) -> bool {
        matches!(self.kind, RouteKind::Direct)
    }

    /// The legs in travel order.
    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    /// Number of line changes.
    pub fn change_count(&self) -> usize {
        self.legs.len() - 1
    }

    /// Source station.
    pub fn origin(&self) -> &str {
        self.legs[0].from_name()
    }

    /// Destination station.
    pub fn destination(&self) -> &str {
        self.legs[self.legs.len() - 1].to_name()
    }

    /// Planned travel time: riding, dwells and any interchange penalty.
    pub fn travel_time(&self) -> Duration {
        self.travel_time
    }

    /// Total track distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.legs.iter().map(RouteLeg::distance_km).sum()
    }

    /// Total station-to-station hops across all legs.
    pub fn hops(&self) -> usize {
        self.legs.iter().map(RouteLeg::hops).sum()
    }

    /// Every station along the route, source to destination.
    ///
    /// At a same-station transfer the station appears once.
    pub fn path(&self) -> Vec<String> {
        let mut path: Vec<String> = Vec::new();
        for leg in &self.legs {
            let skip = usize::from(path.last().map(String::as_str) == Some(leg.from_name()));
            path.extend(leg.path().iter().skip(skip).cloned());
        }
        path
    }
}
