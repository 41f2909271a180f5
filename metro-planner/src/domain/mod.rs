//! Domain types for the metro journey planner.
//!
//! This module contains the typed model of lines, stations and routes.
//! Types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod error;
mod line;
mod offsets;
mod route;
mod station;
mod time;

pub use error::DomainError;
pub use line::{Direction, Line, LineId};
pub use offsets::OffsetIndex;
pub use route::{Route, RouteKind, RouteLeg, TransferPoint};
pub use station::{Layout, Parking, Station};
pub use time::{ClockTime, TimeError, as_minutes, minutes, whole_minutes};
