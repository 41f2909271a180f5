//! Parser for the sectioned metro data format.
//!
//! ```text
//! [RED LINE]
//! Info: Start_Point=Alpha
//! Format: Station | Time to next | Interchange | Layout | Parking | Distance
//! Alpha | 2 | - | Elevated | Available | 1.0
//! Bravo | 2 | Blue Line | Underground | - | 1.5
//! ```
//!
//! Parsing is lenient: every malformed piece is defaulted or skipped, and
//! the problem is logged at `debug` level.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::domain::{Layout, Line, Parking, Station, minutes};

const RECORD_FIELDS: usize = 6;

/// Largest segment time (minutes) or distance (km) taken from a record.
const MAX_FIELD_VALUE: f64 = 100_000.0;

#[derive(Debug, Default)]
struct Section {
    name: String,
    info: BTreeMap<String, String>,
    stations: Vec<Station>,
}

/// Parse dataset text into lines, in the order their headers first appear.
///
/// A header that repeats restarts its section, so the last occurrence wins
/// while the line keeps its original position.
pub fn parse_lines(text: &str) -> Vec<Line> {
    let mut sections: Vec<Section> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;

    for (number, raw) in text.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = parse_header(line) {
            let idx = match by_name.get(header) {
                Some(&idx) => {
                    debug!(line_no, section = header, "repeated section header, restarting");
                    sections[idx] = Section {
                        name: header.to_string(),
                        ..Section::default()
                    };
                    idx
                }
                None => {
                    sections.push(Section {
                        name: header.to_string(),
                        ..Section::default()
                    });
                    by_name.insert(header.to_string(), sections.len() - 1);
                    sections.len() - 1
                }
            };
            current = Some(idx);
            continue;
        }

        let Some(idx) = current else {
            trace!(line_no, "skipping text before first section");
            continue;
        };
        let section = &mut sections[idx];

        if has_prefix(line, "info:") {
            match parse_info(line) {
                Some((key, value)) => {
                    section.info.insert(key, value);
                }
                None => debug!(line_no, "ignoring malformed Info line"),
            }
            continue;
        }
        if has_prefix(line, "format:") {
            continue;
        }
        if line.contains('|') {
            match parse_record(line, line_no) {
                Some(station) => section.stations.push(station),
                None => debug!(line_no, "skipping station record with empty name"),
            }
            continue;
        }

        trace!(line_no, "skipping unrecognised line");
    }

    sections
        .into_iter()
        .map(|s| Line::new(s.name, s.info, s.stations))
        .collect()
}

fn parse_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn parse_info(line: &str) -> Option<(String, String)> {
    let (_, rest) = line.split_once(':')?;
    let (key, value) = rest.trim().split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

fn parse_record(line: &str, line_no: usize) -> Option<Station> {
    let mut fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < RECORD_FIELDS {
        debug!(line_no, fields = fields.len(), "padding short station record");
        fields.resize(RECORD_FIELDS, "-");
    }

    let name = fields[0];
    if name.is_empty() {
        return None;
    }

    let time_to_next = minutes(parse_number(fields[1], "time", line_no));
    let distance_to_next_km = parse_number(fields[5], "distance", line_no);

    Some(Station {
        name: name.to_string(),
        time_to_next,
        distance_to_next_km,
        interchange_tags: split_tags(fields[2]),
        layout: Layout::parse(fields[3]),
        parking: Parking::parse(fields[4]),
    })
}

/// A non-negative number up to [`MAX_FIELD_VALUE`], or zero. `-` and empty
/// fields are zero silently.
fn parse_number(field: &str, what: &'static str, line_no: usize) -> f64 {
    if field.is_empty() || field == "-" {
        return 0.0;
    }
    match field.parse::<f64>() {
        Ok(value) if (0.0..=MAX_FIELD_VALUE).contains(&value) => value,
        _ => {
            debug!(line_no, field, what, "invalid number, using 0");
            0.0
        }
    }
}

fn split_tags(field: &str) -> Vec<String> {
    field
        .split([',', ';'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "-")
        .map(str::to_string)
        .collect()
}
