//! Minimum-time route search.
//!
//! Considers every direct route (both stations on one line) and every
//! single-transfer route (source on line A, destination on line B, changing
//! at a transfer point between them), and keeps the fastest.

use chrono::Duration;
use tracing::{debug, trace};

use crate::dataset::Dataset;
use crate::domain::{LineId, Route, RouteLeg, TransferPoint, as_minutes};

use super::config::PlannerConfig;
use super::error::PlanError;

/// Find the fastest direct or single-transfer route from `src` to `dst`.
///
/// Station names must be exact. On equal travel times the first candidate
/// found wins: lines in dataset order, direct routes before transfers.
///
/// A journey from a station to itself is a zero-hop direct route on the
/// first line serving it.
pub fn find_route(
    dataset: &Dataset,
    src: &str,
    dst: &str,
    config: &PlannerConfig,
) -> Result<Route, PlanError> {
    for station in [src, dst] {
        if !dataset.has_station(station) {
            return Err(PlanError::StationNotFound(station.to_string()));
        }
    }

    let search = RouteSearch {
        dataset,
        dwell: config.dwell(),
        interchange: config.interchange(),
    };

    if src == dst {
        return search.stay(src);
    }

    let mut best: Option<Route> = None;
    let mut candidates = 0usize;

    for route in search.direct_routes(src, dst)? {
        candidates += 1;
        keep_fastest(&mut best, route);
    }
    for route in search.transfer_routes(src, dst)? {
        candidates += 1;
        keep_fastest(&mut best, route);
    }

    debug!(src, dst, candidates, found = best.is_some(), "route search finished");

    best.ok_or_else(|| PlanError::RouteNotFound {
        from: src.to_string(),
        to: dst.to_string(),
    })
}

fn keep_fastest(best: &mut Option<Route>, candidate: Route) {
    let better = best
        .as_ref()
        .is_none_or(|current| candidate.travel_time() < current.travel_time());
    if better {
        trace!(
            path = ?candidate.path(),
            minutes = as_minutes(candidate.travel_time()),
            "new best route"
        );
        *best = Some(candidate);
    }
}

struct RouteSearch<'a> {
    dataset: &'a Dataset,
    dwell: Duration,
    interchange: Duration,
}

impl RouteSearch<'_> {
    /// A leg on `line` between two named stations, if the line calls at both.
    fn leg(&self, id: LineId, from: &str, to: &str) -> Result<Option<RouteLeg>, PlanError> {
        let Some(line) = self.dataset.line(id) else {
            return Ok(None);
        };
        let (Some(from_idx), Some(to_idx)) = (line.position(from), line.position(to)) else {
            return Ok(None);
        };
        Ok(Some(RouteLeg::new(id, line, from_idx, to_idx, self.dwell)?))
    }

    fn stay(&self, station: &str) -> Result<Route, PlanError> {
        let leg = self
            .dataset
            .lines_serving(station)
            .next()
            .map(|id| self.leg(id, station, station))
            .transpose()?
            .flatten()
            .ok_or_else(|| PlanError::StationNotFound(station.to_string()))?;
        Ok(Route::direct(leg))
    }

    fn direct_routes(&self, src: &str, dst: &str) -> Result<Vec<Route>, PlanError> {
        let mut routes = Vec::new();
        for id in self.dataset.lines_serving(src) {
            if let Some(leg) = self.leg(id, src, dst)? {
                trace!(line = %id, minutes = as_minutes(leg.ride_time()), "direct candidate");
                routes.push(Route::direct(leg));
            }
        }
        Ok(routes)
    }

    fn transfer_routes(&self, src: &str, dst: &str) -> Result<Vec<Route>, PlanError> {
        let mut routes = Vec::new();

        for a in self.dataset.lines_serving(src) {
            for b in self.dataset.lines_serving(dst) {
                if a == b {
                    continue;
                }
                for point in self.dataset.transfer_points(a, b) {
                    if let Some(route) = self.via(a, b, src, dst, point)? {
                        routes.push(route);
                    }
                }
            }
        }

        Ok(routes)
    }

    fn via(
        &self,
        a: LineId,
        b: LineId,
        src: &str,
        dst: &str,
        point: TransferPoint,
    ) -> Result<Option<Route>, PlanError> {
        let Some(first) = self.leg(a, src, &point.from)? else {
            return Ok(None);
        };
        let Some(second) = self.leg(b, &point.to, dst)? else {
            return Ok(None);
        };
        // Between linked stations an empty leg is a walk to or from the
        // interchange; within one station the direct route covers it.
        if point.is_same_station() && (first.hops() == 0 || second.hops() == 0) {
            trace!(at = %point, "skipping transfer with an empty leg");
            return Ok(None);
        }

        trace!(
            first = %a,
            second = %b,
            at = %point,
            "transfer candidate"
        );
        Ok(Some(Route::transfer(first, point, second, self.interchange)?))
    }
}
