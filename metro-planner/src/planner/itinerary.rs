//! Timing a route against the departure schedule.

use chrono::Duration;
use tracing::{debug, trace};

use crate::dataset::Dataset;
use crate::domain::{
    ClockTime, Direction, Layout, LineId, Parking, Route, RouteKind, RouteLeg, TransferPoint,
    whole_minutes,
};

use super::config::PlannerConfig;
use super::error::PlanError;
use super::schedule::{DepartureSource, next_train};

/// A station as shown in an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub station: String,
    /// Display name of the line the rider is on here.
    pub line: String,
    pub layout: Layout,
    pub parking: Parking,
}

impl Waypoint {
    fn on(dataset: &Dataset, line: LineId, station: &str) -> Self {
        let line_name = dataset
            .line(line)
            .map(|l| l.display_name())
            .unwrap_or_default();
        let (layout, parking) = dataset
            .station_on(line, station)
            .map(|s| (s.layout.clone(), s.parking))
            .unwrap_or_default();

        Self {
            station: station.to_string(),
            line: line_name,
            layout,
            parking,
        }
    }
}

/// One timed ride.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryLeg {
    pub line: LineId,
    /// Display name of the line.
    pub line_name: String,
    pub direction: Direction,
    /// The terminus the train is heading for.
    pub towards: String,
    pub board: Waypoint,
    pub alight: Waypoint,
    /// When the train reaches the boarding station.
    pub next_train: ClockTime,
    pub arrival: ClockTime,
    pub stops: usize,
    pub distance_km: f64,
}

/// A route with schedule-aware times, distance and fare.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub requested: ClockTime,
    pub origin: Waypoint,
    pub destination: Waypoint,
    pub legs: Vec<ItineraryLeg>,
    /// Where the rider changes lines, for a transfer route.
    pub transfer: Option<TransferPoint>,
    /// Every station passed, origin to destination.
    pub path: Vec<String>,
    pub arrival: ClockTime,
    pub distance_km: f64,
    pub fare: u32,
}

impl Itinerary {
    /// Time from the requested departure to the final arrival.
    pub fn travel_time(&self) -> Duration {
        self.arrival.signed_duration_since(self.requested)
    }

    /// Travel time rounded to whole minutes, halves away from zero.
    pub fn travel_minutes(&self) -> i64 {
        whole_minutes(self.travel_time())
    }

    /// Returns true if the rider changes lines.
    pub fn is_transfer(&self) -> bool {
        self.transfer.is_some()
    }
}

/// Time `route` against `departures`, starting no earlier than `requested`.
///
/// Each leg boards the first train reaching its boarding station at or after
/// the rider is ready: the requested time for the first leg, the previous
/// arrival plus the interchange penalty afterwards. A leg arrives one dwell
/// after the train's running time between its stations.
///
/// A leg without hops takes no train. On a linked transfer this is the walk
/// from the source to the interchange, or from the interchange to the
/// destination; only the interchange penalty is spent.
///
/// # Errors
///
/// - [`PlanError::OutsideServiceHours`] if `requested` is outside the day
/// - [`PlanError::NoServiceAvailable`] if no train is left for some leg
pub fn compute_itinerary<S: DepartureSource>(
    dataset: &Dataset,
    route: &Route,
    requested: ClockTime,
    departures: &S,
    config: &PlannerConfig,
) -> Result<Itinerary, PlanError> {
    check_service_hours(config, requested)?;

    let origin_line = route.legs()[0].line();
    let origin = Waypoint::on(dataset, origin_line, route.origin());
    let destination_line = route.legs()[route.legs().len() - 1].line();
    let destination = Waypoint::on(dataset, destination_line, route.destination());

    let mut legs = Vec::with_capacity(route.legs().len());
    let mut ready = requested;

    for (idx, leg) in route.legs().iter().enumerate() {
        if idx > 0 {
            ready = ready + config.interchange();
        }
        if leg.hops() == 0 {
            trace!(station = leg.from_name(), "no ride on this leg");
            continue;
        }
        let timed = time_leg(dataset, leg, ready, departures, config)?;
        debug!(
            line = %timed.line_name,
            board = %timed.board.station,
            next_train = %timed.next_train,
            arrival = %timed.arrival,
            "timed leg"
        );
        ready = timed.arrival;
        legs.push(timed);
    }

    let distance_km = route.distance_km();
    let transfer = match route.kind() {
        RouteKind::Transfer { at } => Some(at.clone()),
        RouteKind::Direct => None,
    };

    Ok(Itinerary {
        requested,
        origin,
        destination,
        legs,
        transfer,
        path: route.path(),
        arrival: ready,
        distance_km,
        fare: config.fare_slabs.fare(distance_km),
    })
}

pub(crate) fn check_service_hours(config: &PlannerConfig, time: ClockTime) -> Result<(), PlanError> {
    if config.in_service(time) {
        Ok(())
    } else {
        Err(PlanError::OutsideServiceHours {
            requested: time,
            start: config.service_start,
            end: config.service_end,
        })
    }
}

fn time_leg<S: DepartureSource>(
    dataset: &Dataset,
    leg: &RouteLeg,
    ready: ClockTime,
    departures: &S,
    config: &PlannerConfig,
) -> Result<ItineraryLeg, PlanError> {
    let line_name = dataset
        .line(leg.line())
        .map(|l| l.display_name())
        .unwrap_or_default();
    let no_service = || PlanError::NoServiceAvailable {
        line: line_name.clone(),
        station: leg.from_name().to_string(),
        after: ready,
    };

    let line = dataset.line(leg.line()).ok_or_else(no_service)?;
    let direction = leg.direction();
    let offset = line
        .offset_in_direction(leg.from_idx(), direction)
        .ok_or_else(no_service)?;
    let running = line
        .offsets()
        .time_between(leg.from_idx(), leg.to_idx())
        .ok_or_else(no_service)?;

    let next = next_train(departures.departures(leg.line(), direction), offset, ready)
        .ok_or_else(no_service)?;
    let arrival = next + running + config.dwell();

    let towards = line
        .terminus(direction)
        .map(|s| s.name.clone())
        .unwrap_or_default();

    Ok(ItineraryLeg {
        line: leg.line(),
        line_name: line_name.clone(),
        direction,
        towards,
        board: Waypoint::on(dataset, leg.line(), leg.from_name()),
        alight: Waypoint::on(dataset, leg.line(), leg.to_name()),
        next_train: next,
        arrival,
        stops: leg.hops(),
        distance_km: leg.distance_km(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::dataset::fixture;
    use crate::planner::{FrequencySchedule, find_route};

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    /// Hand-written timetable keyed by line and direction.
    #[derive(Default)]
    struct FixedDepartures {
        times: HashMap<(LineId, Direction), Vec<ClockTime>>,
    }

    impl FixedDepartures {
        fn with(mut self, line: LineId, direction: Direction, times: &[&str]) -> Self {
            self.times
                .insert((line, direction), times.iter().map(|s| t(s)).collect());
            self
        }
    }

    impl DepartureSource for FixedDepartures {
        fn departures(&self, line: LineId, direction: Direction) -> &[ClockTime] {
            self.times
                .get(&(line, direction))
                .map(Vec::as_slice)
                .unwrap_or(&[])
        }
    }

    fn plan(from: &str, to: &str, at: &str) -> Result<Itinerary, PlanError> {
        let dataset = fixture::network();
        let config = PlannerConfig::default();
        let schedule = FrequencySchedule::from_config(&config);
        let route = find_route(&dataset, from, to, &config)?;
        compute_itinerary(&dataset, &route, t(at), &schedule, &config)
    }

    #[test]
    fn direct_itinerary() {
        let itinerary = plan("Alpha", "Delta", "09:18").unwrap();

        assert_eq!(itinerary.legs.len(), 1);
        let leg = &itinerary.legs[0];
        assert_eq!(leg.next_train, t("09:20"));
        // 09:20 + 6 running + 0.5 dwell
        assert_eq!(leg.arrival, t("09:26") + Duration::seconds(30));
        assert_eq!(leg.arrival.to_string(), "09:27");
        assert_eq!(leg.towards, "Delta");
        assert_eq!(leg.line_name, "Red Line");
        assert_eq!(leg.stops, 3);

        assert_eq!(itinerary.travel_minutes(), 9);
        assert_eq!(itinerary.distance_km, 4.5);
        assert_eq!(itinerary.fare, 20);
        assert!(!itinerary.is_transfer());
        assert_eq!(itinerary.origin.layout, Layout::Elevated);
        assert_eq!(itinerary.origin.parking, Parking::Yes);
        assert_eq!(itinerary.destination.layout, Layout::AtGrade);
    }

    #[test]
    fn offset_shifts_next_train() {
        let itinerary = plan("Bravo", "Delta", "09:18").unwrap();
        assert_eq!(itinerary.legs[0].next_train, t("09:18"));
    }

    #[test]
    fn reverse_direction_uses_offset_from_end() {
        // Delta is the end terminus, so its offset towards the start is zero.
        let itinerary = plan("Delta", "Alpha", "09:18").unwrap();
        let leg = &itinerary.legs[0];
        assert_eq!(leg.direction, Direction::TowardsStart);
        assert_eq!(leg.towards, "Alpha");
        assert_eq!(leg.next_train, t("09:20"));

        // Central is 2 minutes from Delta.
        let itinerary = plan("Central", "Alpha", "09:18").unwrap();
        assert_eq!(itinerary.legs[0].next_train, t("09:18"));
    }

    #[test]
    fn transfer_itinerary() {
        let itinerary = plan("Alpha", "South", "09:18").unwrap();

        assert_eq!(itinerary.transfer, Some(TransferPoint::same_station("Central")));
        assert_eq!(itinerary.legs.len(), 2);

        let (red, blue) = (&itinerary.legs[0], &itinerary.legs[1]);
        assert_eq!(red.next_train, t("09:20"));
        assert_eq!(red.arrival, t("09:24") + Duration::seconds(30));
        // Ready at 09:26.5; Blue trains reach Central 3 minutes after leaving North.
        assert_eq!(blue.next_train, t("09:27"));
        assert_eq!(blue.arrival, t("09:30") + Duration::seconds(30));
        assert_eq!(blue.line_name, "Blue Line");

        assert_eq!(itinerary.path, vec!["Alpha", "Bravo", "Central", "South"]);
        assert_eq!(itinerary.travel_minutes(), 13);
        assert_eq!(itinerary.distance_km, 3.5);
        assert_eq!(itinerary.fare, 20);
        assert_eq!(itinerary.destination.parking, Parking::Yes);
    }

    #[test]
    fn linked_transfer_itinerary() {
        let itinerary = plan("Quay", "Outer", "12:00").unwrap();

        assert_eq!(
            itinerary.transfer,
            Some(TransferPoint::linked("Harbour", "Delta Park"))
        );
        assert_eq!(itinerary.path, vec!["Quay", "Harbour", "Delta Park", "Outer"]);
        assert_eq!(itinerary.distance_km, 9.0);
        assert_eq!(itinerary.fare, 30);
        assert_eq!(itinerary.legs[1].board.station, "Delta Park");
        assert_eq!(itinerary.legs[1].line_name, "Orange Line");
    }

    #[test]
    fn walk_from_linked_source() {
        // Harbour is linked to Delta Park; the rider walks over and boards.
        let itinerary = plan("Harbour", "Outer", "12:00").unwrap();

        assert_eq!(
            itinerary.transfer,
            Some(TransferPoint::linked("Harbour", "Delta Park"))
        );
        assert_eq!(itinerary.legs.len(), 1);
        let orange = &itinerary.legs[0];
        assert_eq!(orange.board.station, "Delta Park");
        // Ready at 12:02; next Orange train at 12:08.
        assert_eq!(orange.next_train, t("12:08"));
        assert_eq!(orange.arrival, t("12:13") + Duration::seconds(30));
        assert_eq!(itinerary.origin.station, "Harbour");
        assert_eq!(itinerary.origin.line, "Green Line");
        assert_eq!(itinerary.path, vec!["Harbour", "Delta Park", "Outer"]);
        assert_eq!(itinerary.distance_km, 5.0);
        assert_eq!(itinerary.travel_minutes(), 14);
    }

    #[test]
    fn walk_to_linked_destination() {
        let itinerary = plan("Quay", "Delta Park", "12:00").unwrap();

        assert_eq!(itinerary.legs.len(), 1);
        let green = &itinerary.legs[0];
        assert_eq!(green.next_train, t("12:00"));
        assert_eq!(green.alight.station, "Harbour");
        // 12:04.5 at Harbour, then the walk.
        assert_eq!(itinerary.arrival, t("12:06") + Duration::seconds(30));
        assert_eq!(itinerary.destination.station, "Delta Park");
        assert_eq!(itinerary.destination.line, "Orange Line");
        assert_eq!(itinerary.distance_km, 4.0);
        assert_eq!(itinerary.fare, 20);
        assert_eq!(itinerary.travel_minutes(), 7);
    }

    #[test]
    fn no_connecting_train_late_at_night() {
        let err = plan("Alpha", "South", "23:00").unwrap_err();
        assert_eq!(
            err,
            PlanError::NoServiceAvailable {
                line: "Blue Line".into(),
                station: "Central".into(),
                after: t("23:06") + Duration::seconds(30),
            }
        );
    }

    #[test]
    fn outside_service_hours() {
        let err = plan("Alpha", "Delta", "05:30").unwrap_err();
        assert!(matches!(err, PlanError::OutsideServiceHours { .. }));
        let err = plan("Alpha", "Delta", "23:30").unwrap_err();
        assert!(matches!(err, PlanError::OutsideServiceHours { .. }));
    }

    #[test]
    fn zero_hop_itinerary() {
        let itinerary = plan("Central", "Central", "09:18").unwrap();
        assert!(itinerary.legs.is_empty());
        assert_eq!(itinerary.arrival, t("09:18"));
        assert_eq!(itinerary.travel_minutes(), 0);
        assert_eq!(itinerary.distance_km, 0.0);
        assert_eq!(itinerary.fare, 10);
        assert_eq!(itinerary.path, vec!["Central"]);
    }

    #[test]
    fn injected_timetable() {
        let dataset = fixture::network();
        let config = PlannerConfig::default();
        let route = find_route(&dataset, "Alpha", "Delta", &config).unwrap();

        let departures = FixedDepartures::default().with(
            LineId(0),
            Direction::TowardsEnd,
            &["09:00", "09:45"],
        );
        let itinerary =
            compute_itinerary(&dataset, &route, t("09:18"), &departures, &config).unwrap();
        assert_eq!(itinerary.legs[0].next_train, t("09:45"));
        assert_eq!(itinerary.travel_minutes(), 34);

        let empty = FixedDepartures::default();
        assert!(matches!(
            compute_itinerary(&dataset, &route, t("09:18"), &empty, &config),
            Err(PlanError::NoServiceAvailable { .. })
        ));
    }
}
