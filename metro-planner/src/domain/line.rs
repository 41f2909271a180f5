//! Metro lines.
//!
//! A `Line` owns its stations in terminus-to-terminus order together with
//! the offsets derived from them. Lines are immutable once built.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::Duration;

use super::{OffsetIndex, Station};

/// Index of a line within a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub usize);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Direction of travel along a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the first station towards the last.
    TowardsEnd,
    /// From the last station towards the first.
    TowardsStart,
}

impl Direction {
    /// Direction of travel from station index `from` to station index `to`.
    ///
    /// Staying put counts as travelling towards the end.
    pub fn between(from: usize, to: usize) -> Self {
        if to >= from {
            Direction::TowardsEnd
        } else {
            Direction::TowardsStart
        }
    }
}

/// A metro line: an ordered sequence of stations.
#[derive(Debug, Clone)]
pub struct Line {
    name: String,
    info: BTreeMap<String, String>,
    stations: Vec<Station>,
    offsets: OffsetIndex,
    positions: HashMap<String, usize>,
}

impl Line {
    /// Build a line, deriving its offsets and name lookup.
    ///
    /// Station names are expected to be unique within a line; if a name
    /// repeats, lookups resolve to its first occurrence.
    pub fn new(
        name: impl Into<String>,
        info: BTreeMap<String, String>,
        stations: Vec<Station>,
    ) -> Self {
        let mut positions = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            positions.entry(station.name.clone()).or_insert(idx);
        }
        let offsets = OffsetIndex::from_stations(&stations);

        Self {
            name: name.into(),
            info,
            stations,
            offsets,
            positions,
        }
    }

    /// The line's name as written in the dataset header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A short display name: the part before any " - " suffix, in title case.
    ///
    /// # Examples
    ///
    /// ```
    /// use metro_planner::domain::Line;
    ///
    /// let line = Line::new("BLUE LINE - BRANCH", Default::default(), vec![]);
    /// assert_eq!(line.display_name(), "Blue Line");
    /// ```
    pub fn display_name(&self) -> String {
        let base = self.name.split('-').next().unwrap_or("").trim();
        base.split_whitespace()
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `Info:` metadata attached to the line.
    pub fn info(&self) -> &BTreeMap<String, String> {
        &self.info
    }

    /// Stations in line order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// The station at `idx`.
    pub fn station(&self, idx: usize) -> Option<&Station> {
        self.stations.get(idx)
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the line has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// First station (start terminus).
    pub fn first(&self) -> Option<&Station> {
        self.stations.first()
    }

    /// Last station (end terminus).
    pub fn last(&self) -> Option<&Station> {
        self.stations.last()
    }

    /// The terminus a train travelling in `direction` is heading for.
    pub fn terminus(&self, direction: Direction) -> Option<&Station> {
        match direction {
            Direction::TowardsEnd => self.last(),
            Direction::TowardsStart => self.first(),
        }
    }

    /// Position of a station by exact name.
    pub fn position(&self, station: &str) -> Option<usize> {
        self.positions.get(station).copied()
    }

    /// Returns true if the line calls at `station`.
    pub fn contains(&self, station: &str) -> bool {
        self.positions.contains_key(station)
    }

    /// Derived offsets.
    pub fn offsets(&self) -> &OffsetIndex {
        &self.offsets
    }

    /// Offset of station `idx` from the terminus a train in `direction`
    /// starts at.
    pub fn offset_in_direction(&self, idx: usize, direction: Direction) -> Option<Duration> {
        match direction {
            Direction::TowardsEnd => self.offsets.time_from_start(idx),
            Direction::TowardsStart => self.offsets.time_from_end(idx),
        }
    }

    /// Riding time between two stations: the segment times of every hop plus
    /// one dwell at each intermediate station.
    ///
    /// Returns `None` if either index is out of range.
    pub fn ride_time(&self, from: usize, to: usize, dwell: Duration) -> Option<Duration> {
        if from >= self.len() || to >= self.len() {
            return None;
        }
        let (lo, hi) = (from.min(to), from.max(to));
        let hops = hi - lo;

        let running = self.stations[lo..hi]
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.time_to_next);
        let dwells = dwell * i32::try_from(hops.saturating_sub(1)).unwrap_or(i32::MAX);

        Some(running + dwells)
    }

    /// Station names from `from` to `to` inclusive, in travel order.
    pub fn path(&self, from: usize, to: usize) -> Vec<String> {
        if from >= self.len() || to >= self.len() {
            return Vec::new();
        }
        if from <= to {
            self.stations[from..=to]
                .iter()
                .map(|s| s.name.clone())
                .collect()
        } else {
            self.stations[to..=from]
                .iter()
                .rev()
                .map(|s| s.name.clone())
                .collect()
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
