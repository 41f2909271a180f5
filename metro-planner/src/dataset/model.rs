//! The loaded metro network.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{Line, LineId, Station, TransferPoint};
use crate::interchange::InterchangeEdges;

use super::error::DatasetError;
use super::parse::parse_lines;

/// Every line in the network, with cross-line indexes.
///
/// Built once per run and read-only afterwards. Lines live in an arena and
/// are addressed by [`LineId`], which is their position in dataset order.
#[derive(Debug, Clone)]
pub struct Dataset {
    lines: Vec<Line>,
    station_lines: BTreeMap<String, BTreeSet<LineId>>,
    interchanges: InterchangeEdges,
}

impl Dataset {
    /// Build the indexes over `lines`.
    pub fn new(lines: Vec<Line>) -> Self {
        let mut station_lines: BTreeMap<String, BTreeSet<LineId>> = BTreeMap::new();
        for (idx, line) in lines.iter().enumerate() {
            for station in line.stations() {
                station_lines
                    .entry(station.name.clone())
                    .or_default()
                    .insert(LineId(idx));
            }
        }
        let interchanges = InterchangeEdges::from_lines(&lines);

        debug!(
            lines = lines.len(),
            stations = station_lines.len(),
            interchange_edges = interchanges.len(),
            "dataset indexed"
        );

        Self {
            lines,
            station_lines,
            interchanges,
        }
    }

    /// Parse dataset text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Empty`] if the text has no line sections.
    pub fn parse(text: &str) -> Result<Self, DatasetError> {
        let lines = parse_lines(text);
        if lines.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self::new(lines))
    }

    /// Read and parse a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::parse(&text)?;
        info!(path = %path.display(), lines = dataset.lines.len(), "loaded dataset");
        Ok(dataset)
    }

    /// All lines in dataset order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line ids with their lines, in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (LineId(idx), line))
    }

    /// The line with the given id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.0)
    }

    /// Every distinct station name, in name order.
    pub fn station_names(&self) -> impl Iterator<Item = &str> {
        self.station_lines.keys().map(String::as_str)
    }

    /// Returns true if any line calls at `station` (exact name).
    pub fn has_station(&self, station: &str) -> bool {
        self.station_lines.contains_key(station)
    }

    /// Lines calling at `station`, in dataset order.
    pub fn lines_serving(&self, station: &str) -> impl Iterator<Item = LineId> + '_ {
        self.station_lines.get(station).into_iter().flatten().copied()
    }

    /// The station record for `name` on `line`.
    pub fn station_on(&self, line: LineId, name: &str) -> Option<&Station> {
        let line = self.line(line)?;
        line.station(line.position(name)?)
    }

    /// Resolved interchange edges.
    pub fn interchanges(&self) -> &InterchangeEdges {
        &self.interchanges
    }

    /// Every place a rider on line `a` can change to line `b`.
    ///
    /// - stations called at by both lines (this covers every station
    ///   carrying a line link between them)
    /// - a station of `a` linked to a differently-named station of `b`
    pub fn transfer_points(&self, a: LineId, b: LineId) -> BTreeSet<TransferPoint> {
        let mut points = BTreeSet::new();
        if a == b {
            return points;
        }
        let (Some(line_a), Some(line_b)) = (self.line(a), self.line(b)) else {
            return points;
        };

        for station in line_a.stations() {
            let name = station.name.as_str();

            if line_b.contains(name) {
                points.insert(TransferPoint::same_station(name));
            }

            for other in self.interchanges.linked_stations(name) {
                if line_b.contains(other) {
                    points.insert(TransferPoint::linked(name, other));
                }
            }
        }

        points
    }
}
