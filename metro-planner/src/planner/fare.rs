//! Distance-based fares.

use serde::Deserialize;

/// Reasons a fare table cannot be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FareError {
    #[error("fare table is empty")]
    Empty,

    #[error("only the last fare slab may be unbounded")]
    UnboundedSlab,

    #[error("fare slab bound {0} is not a distance")]
    BadBound(f64),

    #[error("fare slab bounds not ascending: {0} then {1}")]
    Unordered(f64, f64),

    #[error("fares decrease from {0} to {1}")]
    Decreasing(u32, u32),
}

/// One step of a fare table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FareSlab {
    /// Upper bound of the slab in kilometres, inclusive. `None` covers every
    /// longer distance.
    pub max_km: Option<f64>,
    pub fare: u32,
}

impl FareSlab {
    /// A slab covering distances up to `max_km`.
    pub fn up_to(max_km: f64, fare: u32) -> Self {
        Self {
            max_km: Some(max_km),
            fare,
        }
    }

    /// A slab covering every remaining distance.
    pub fn beyond(fare: u32) -> Self {
        Self { max_km: None, fare }
    }

    fn covers(&self, distance_km: f64) -> bool {
        self.max_km.is_none_or(|max| distance_km <= max)
    }
}

/// Ascending slabs mapping total distance to a fare.
///
/// # Examples
///
/// ```
/// use metro_planner::planner::PlannerConfig;
///
/// let fares = PlannerConfig::default().fare_slabs;
/// assert_eq!(fares.fare(1.5), 10);
/// assert_eq!(fares.fare(5.0), 20);
/// assert_eq!(fares.fare(33.0), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FareTable {
    slabs: Vec<FareSlab>,
}

impl FareTable {
    pub fn new(slabs: Vec<FareSlab>) -> Self {
        Self { slabs }
    }

    /// The slabs, lowest distance first.
    pub fn slabs(&self) -> &[FareSlab] {
        &self.slabs
    }

    /// Fare for a journey of `distance_km`.
    ///
    /// The first slab covering the distance applies. Distances past the last
    /// bounded slab pay the last slab's fare; an empty table charges nothing.
    pub fn fare(&self, distance_km: f64) -> u32 {
        self.slabs
            .iter()
            .find(|slab| slab.covers(distance_km))
            .or(self.slabs.last())
            .map_or(0, |slab| slab.fare)
    }

    /// Check the slabs form a non-decreasing step function.
    pub fn validate(&self) -> Result<(), FareError> {
        if self.slabs.is_empty() {
            return Err(FareError::Empty);
        }

        for (idx, slab) in self.slabs.iter().enumerate() {
            if slab.max_km.is_none() && idx + 1 != self.slabs.len() {
                return Err(FareError::UnboundedSlab);
            }
            if let Some(max) = slab.max_km {
                if !max.is_finite() || max < 0.0 {
                    return Err(FareError::BadBound(max));
                }
            }
        }

        for pair in self.slabs.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if let (Some(a), Some(b)) = (lower.max_km, upper.max_km) {
                if b <= a {
                    return Err(FareError::Unordered(a, b));
                }
            }
            if upper.fare < lower.fare {
                return Err(FareError::Decreasing(lower.fare, upper.fare));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlannerConfig;

    fn default_table() -> FareTable {
        PlannerConfig::default().fare_slabs
    }

    #[test]
    fn default_slabs() {
        let fares = default_table();

        assert_eq!(fares.fare(0.0), 10);
        assert_eq!(fares.fare(1.5), 10);
        assert_eq!(fares.fare(2.0), 10);
        assert_eq!(fares.fare(2.01), 20);
        assert_eq!(fares.fare(4.5), 20);
        assert_eq!(fares.fare(12.0), 30);
        assert_eq!(fares.fare(21.0), 40);
        assert_eq!(fares.fare(32.0), 50);
        assert_eq!(fares.fare(33.0), 60);
        assert_eq!(fares.fare(500.0), 60);
    }

    #[test]
    fn bounded_table_caps_at_last_slab() {
        let fares = FareTable::new(vec![FareSlab::up_to(3.0, 5), FareSlab::up_to(6.0, 8)]);
        assert_eq!(fares.fare(10.0), 8);
        assert!(fares.validate().is_ok());
    }

    #[test]
    fn empty_table_is_free_but_invalid() {
        let fares = FareTable::new(Vec::new());
        assert_eq!(fares.fare(3.0), 0);
        assert_eq!(fares.validate(), Err(FareError::Empty));
    }

    #[test]
    fn validation_errors() {
        let unbounded_middle = FareTable::new(vec![FareSlab::beyond(10), FareSlab::up_to(5.0, 20)]);
        assert_eq!(unbounded_middle.validate(), Err(FareError::UnboundedSlab));

        let decreasing = FareTable::new(vec![FareSlab::up_to(2.0, 20), FareSlab::beyond(10)]);
        assert_eq!(decreasing.validate(), Err(FareError::Decreasing(20, 10)));

        let unordered = FareTable::new(vec![FareSlab::up_to(5.0, 10), FareSlab::up_to(5.0, 20)]);
        assert_eq!(unordered.validate(), Err(FareError::Unordered(5.0, 5.0)));

        let negative = FareTable::new(vec![FareSlab::up_to(-1.0, 10)]);
        assert_eq!(negative.validate(), Err(FareError::BadBound(-1.0)));
    }

    #[test]
    fn error_display() {
        assert_eq!(FareError::Empty.to_string(), "fare table is empty");
        assert_eq!(
            FareError::Unordered(5.0, 2.0).to_string(),
            "fare slab bounds not ascending: 5 then 2"
        );
        assert_eq!(FareError::Decreasing(20, 10).to_string(), "fares decrease from 20 to 10");
    }
}
