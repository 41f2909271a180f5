//! Loading the metro network from its sectioned text file.
//!
//! The loader turns the text into typed [`Line`](crate::domain::Line)s,
//! indexes stations across lines and resolves interchange tags into edges.

mod error;
mod model;
mod names;
mod parse;

pub use error::DatasetError;
pub use model::Dataset;
pub use names::{levenshtein, match_line, match_station, match_station_on_line};
pub use parse::parse_lines;

#[cfg(test)]
pub(crate) use model::fixture;
