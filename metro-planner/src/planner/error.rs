//! Errors answering a rider's query.

use crate::domain::{ClockTime, DomainError, TimeError};

/// Why a journey plan or departure board could not be produced.
///
/// Every variant ends the query; the message is shown to the rider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// No station matches the rider's text
    #[error("station not found: {0}")]
    StationNotFound(String),

    /// No line matches the rider's text
    #[error("line not found: {0}")]
    LineNotFound(String),

    /// Neither a direct nor a single-transfer route exists
    #[error("no route found from {from} to {to} (direct or single transfer)")]
    RouteNotFound { from: String, to: String },

    /// The requested time is outside the operating day
    #[error(
        "requested time {requested} is outside service hours; metro service runs from {} to {}",
        start.to_12h_string(),
        end.to_12h_string()
    )]
    OutsideServiceHours {
        requested: ClockTime,
        start: ClockTime,
        end: ClockTime,
    },

    /// No train reaches the station in time
    #[error("no {line} service from {station} at or after {after}")]
    NoServiceAvailable {
        line: String,
        station: String,
        after: ClockTime,
    },

    /// The requested time could not be parsed
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// A route could not be assembled
    #[error(transparent)]
    Domain(#[from] DomainError),
}
