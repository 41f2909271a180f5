//! Domain error types.
//!
//! These errors represent construction failures in the domain layer. They
//! are distinct from query errors reported to riders.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Leg endpoints do not exist on the leg's line
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't meet at the transfer point
    #[error("legs do not connect: {0} does not lead to {1}")]
    LegsNotConnected(String, String),
}
