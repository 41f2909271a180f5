//! Cumulative time and distance offsets along a line.
//!
//! Offsets are measured from the first station. The offset from the far
//! terminus is the line total minus the offset from the start, so one pass
//! over the stations serves both directions.

use chrono::Duration;

use super::Station;

/// Per-station offsets for one line, indexed by station position.
///
/// # Invariants
///
/// - Offsets are non-decreasing in station order
/// - The first station's offset is zero
/// - The last station's offset equals the line total
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OffsetIndex {
    time: Vec<Duration>,
    distance_km: Vec<f64>,
}

impl OffsetIndex {
    /// Build the index from a line's stations in order.
    ///
    /// Each station contributes its "to next" fields to every station after
    /// it; the last station's fields have no next station and are ignored.
    pub fn from_stations(stations: &[Station]) -> Self {
        let mut time = Vec::with_capacity(stations.len());
        let mut distance_km = Vec::with_capacity(stations.len());
        let mut cum_time = Duration::zero();
        let mut cum_distance = 0.0;

        if !stations.is_empty() {
            time.push(cum_time);
            distance_km.push(cum_distance);
        }
        for segment in stations.windows(2) {
            cum_time += segment[0].time_to_next;
            cum_distance += segment[0].distance_to_next_km;
            time.push(cum_time);
            distance_km.push(cum_distance);
        }

        Self { time, distance_km }
    }

    /// Number of stations covered.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the line has no stations.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Total running time from the first to the last station.
    pub fn total_time(&self) -> Duration {
        self.time.last().copied().unwrap_or_else(Duration::zero)
    }

    /// Total track length in kilometres.
    pub fn total_distance_km(&self) -> f64 {
        self.distance_km.last().copied().unwrap_or(0.0)
    }

    /// Running time from the first station to station `idx`.
    pub fn time_from_start(&self, idx: usize) -> Option<Duration> {
        self.time.get(idx).copied()
    }

    /// Running time from the last station to station `idx`.
    pub fn time_from_end(&self, idx: usize) -> Option<Duration> {
        self.time_from_start(idx).map(|t| self.total_time() - t)
    }

    /// Distance from the first station to station `idx`.
    pub fn distance_from_start(&self, idx: usize) -> Option<f64> {
        self.distance_km.get(idx).copied()
    }

    /// Distance from the last station to station `idx`.
    pub fn distance_from_end(&self, idx: usize) -> Option<f64> {
        self.distance_from_start(idx)
            .map(|d| self.total_distance_km() - d)
    }

    /// Running time between two stations, in either direction.
    pub fn time_between(&self, a: usize, b: usize) -> Option<Duration> {
        let ta = self.time_from_start(a)?;
        let tb = self.time_from_start(b)?;
        Some((tb - ta).abs())
    }

    /// Track distance between two stations, in either direction.
    pub fn distance_between(&self, a: usize, b: usize) -> Option<f64> {
        let da = self.distance_from_start(a)?;
        let db = self.distance_from_start(b)?;
        Some((db - da).abs())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_stations() -> impl Strategy<Value = Vec<Station>> {
        prop::collection::vec((0i64..600, 0u32..1000), 1..20).prop_map(|fields| {
            fields
                .into_iter()
                .enumerate()
                .map(|(i, (secs, dist))| {
                    Station::new(
                        format!("S{i}"),
                        Duration::seconds(secs),
                        f64::from(dist) / 100.0,
                    )
                })
                .collect()
        })
    }

    proptest! {
        /// Offsets never decrease along the line and end at the total
        #[test]
        fn offsets_monotonic(stations in arb_stations()) {
            let index = OffsetIndex::from_stations(&stations);
            let last = stations.len() - 1;

            for i in 1..stations.len() {
                prop_assert!(index.time_from_start(i) >= index.time_from_start(i - 1));
                prop_assert!(index.distance_from_start(i) >= index.distance_from_start(i - 1));
            }
            prop_assert_eq!(index.time_from_start(last), Some(index.total_time()));
            prop_assert_eq!(index.time_from_end(last), Some(Duration::zero()));
        }

        /// The total equals the sum of every segment that has a next station
        #[test]
        fn total_is_segment_sum(stations in arb_stations()) {
            let index = OffsetIndex::from_stations(&stations);
            let segments = &stations[..stations.len() - 1];

            let time_sum = segments
                .iter()
                .fold(Duration::zero(), |acc, s| acc + s.time_to_next);
            prop_assert_eq!(index.total_time(), time_sum);

            let distance_sum: f64 = segments.iter().map(|s| s.distance_to_next_km).sum();
            prop_assert!((index.total_distance_km() - distance_sum).abs() < 1e-9);
        }
    }
}
