//! Interchange edges between stations and lines.
//!
//! The dataset marks interchange stations with free-text tags such as
//! "Yellow Line" or "Rajiv Chowk". These are resolved once, when the dataset
//! is built, into explicit edges so that transfer discovery is a lookup:
//!
//! - station ↔ station: two stations (usually differently named, on
//!   different lines) a rider can change between
//! - station ↔ line: a station that offers a change to another line

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::domain::{Line, LineId};

/// A collection of interchange edges.
///
/// Station links are stored both ways. Line links are keyed by station name.
#[derive(Debug, Clone, Default)]
pub struct InterchangeEdges {
    station_links: HashMap<String, BTreeSet<String>>,
    line_links: HashMap<String, BTreeSet<LineId>>,
}

impl InterchangeEdges {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the interchange tags of every station on `lines`.
    ///
    /// A tag exactly naming (case-insensitively) a station elsewhere in the
    /// dataset becomes a station ↔ station edge. A tag that names another
    /// line (case-insensitive substring of the line's name) becomes a
    /// station ↔ line edge for each line it names. One tag can do both.
    /// Anything else is ignored.
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut edges = Self::new();

        let mut canonical_names: HashMap<String, &str> = HashMap::new();
        for line in lines {
            for station in line.stations() {
                canonical_names
                    .entry(station.name.to_lowercase())
                    .or_insert(&station.name);
            }
        }

        for (idx, line) in lines.iter().enumerate() {
            for station in line.stations() {
                for tag in &station.interchange_tags {
                    let needle = tag.to_lowercase();
                    let mut resolved = false;

                    if let Some(other) = canonical_names.get(&needle) {
                        resolved = true;
                        if *other != station.name {
                            trace!(from = %station.name, to = %other, "station interchange");
                            edges.add_station_link(&station.name, other);
                        }
                    }

                    for (other_idx, other) in lines.iter().enumerate() {
                        if other_idx != idx && other.name().to_lowercase().contains(&needle) {
                            resolved = true;
                            trace!(station = %station.name, line = %other.name(), "line interchange");
                            edges.add_line_link(&station.name, LineId(other_idx));
                        }
                    }

                    if !resolved {
                        debug!(
                            station = %station.name,
                            line = %line.name(),
                            tag = %tag,
                            "unresolved interchange tag"
                        );
                    }
                }
            }
        }

        edges
    }

    /// Link two stations. The link is stored in both directions.
    pub fn add_station_link(&mut self, a: &str, b: &str) {
        self.station_links
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.station_links
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    /// Link a station to a line it offers a change to.
    pub fn add_line_link(&mut self, station: &str, line: LineId) {
        self.line_links
            .entry(station.to_string())
            .or_default()
            .insert(line);
    }

    /// Stations linked to `station`.
    pub fn linked_stations(&self, station: &str) -> impl Iterator<Item = &str> {
        self.station_links
            .get(station)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Lines `station` offers a change to.
    pub fn linked_lines(&self, station: &str) -> impl Iterator<Item = LineId> + '_ {
        self.line_links.get(station).into_iter().flatten().copied()
    }

    /// Check if two stations are linked.
    pub fn is_linked(&self, a: &str, b: &str) -> bool {
        self.station_links.get(a).is_some_and(|set| set.contains(b))
    }

    /// Returns the number of station links (counting A↔B once) plus line links.
    pub fn len(&self) -> usize {
        let station_pairs: usize = self.station_links.values().map(BTreeSet::len).sum();
        let line_pairs: usize = self.line_links.values().map(BTreeSet::len).sum();
        station_pairs / 2 + line_pairs
    }

    /// Returns true if there are no edges.
    pub fn is_empty(&self) -> bool {
        self.station_links.is_empty() && self.line_links.is_empty()
    }
}
