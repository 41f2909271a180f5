//! Metro journey planner.
//!
//! Loads a metro network from a sectioned text dataset and answers two
//! questions: "what is the fastest way from A to B if I set off now?" and
//! "when are the next trains at this station?"
//!
//! Routes are either direct or use a single transfer. Trains run on a fixed
//! frequency timetable with faster service in peak windows, and journeys are
//! priced from a distance-based fare table.

pub mod dataset;
pub mod domain;
pub mod interchange;
pub mod planner;
pub mod report;
