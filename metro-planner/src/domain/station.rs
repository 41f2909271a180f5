//! Station records.

use std::fmt;

use chrono::Duration;

/// How a station is built.
///
/// The dataset stores this as free text; the common values are recognised
/// and anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    Elevated,
    Underground,
    AtGrade,
    /// Any other description, as written in the dataset.
    Other(String),
    /// No layout given (`-` or empty).
    #[default]
    Unknown,
}

impl Layout {
    /// Interpret a layout field.
    ///
    /// # Examples
    ///
    /// ```
    /// use metro_planner::domain::Layout;
    ///
    /// assert_eq!(Layout::parse("Elevated"), Layout::Elevated);
    /// assert_eq!(Layout::parse("at grade"), Layout::AtGrade);
    /// assert_eq!(Layout::parse("-"), Layout::Unknown);
    /// assert_eq!(Layout::parse("Bridge"), Layout::Other("Bridge".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let key: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "" => Layout::Unknown,
            "elevated" => Layout::Elevated,
            "underground" => Layout::Underground,
            "atgrade" | "grade" => Layout::AtGrade,
            _ => Layout::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Elevated => f.write_str("Elevated"),
            Layout::Underground => f.write_str("Underground"),
            Layout::AtGrade => f.write_str("At-Grade"),
            Layout::Other(text) => f.write_str(text),
            Layout::Unknown => f.write_str("-"),
        }
    }
}

/// Whether a station has rider parking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parking {
    Yes,
    #[default]
    No,
}

impl Parking {
    /// Normalize a parking field. Only an explicit affirmative counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use metro_planner::domain::Parking;
    ///
    /// assert_eq!(Parking::parse("Available"), Parking::Yes);
    /// assert_eq!(Parking::parse(" y "), Parking::Yes);
    /// assert_eq!(Parking::parse("-"), Parking::No);
    /// assert_eq!(Parking::parse("limited"), Parking::No);
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "available" | "yes" | "y" | "true" => Parking::Yes,
            _ => Parking::No,
        }
    }
}

impl fmt::Display for Parking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parking::Yes => f.write_str("Yes"),
            Parking::No => f.write_str("No"),
        }
    }
}

/// A station as it appears on one line.
///
/// The "to next" fields describe the segment towards the following station
/// in the line's order; on the last station they are unused.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Station name, unique within its line.
    pub name: String,
    /// Running time to the next station.
    pub time_to_next: Duration,
    /// Track distance to the next station, in kilometres.
    pub distance_to_next_km: f64,
    /// Free-text interchange hints (station or line names).
    pub interchange_tags: Vec<String>,
    pub layout: Layout,
    pub parking: Parking,
}

impl Station {
    /// Creates a station with no interchange tags and unknown metadata.
    pub fn new(name: impl Into<String>, time_to_next: Duration, distance_to_next_km: f64) -> Self {
        Self {
            name: name.into(),
            time_to_next,
            distance_to_next_km,
            interchange_tags: Vec::new(),
            layout: Layout::Unknown,
            parking: Parking::No,
        }
    }

    /// Returns true if the station carries at least one interchange tag.
    pub fn is_interchange(&self) -> bool {
        !self.interchange_tags.is_empty()
    }
}
