//! Askama text templates for CLI output.

use askama::Template;

use crate::dataset::Dataset;
use crate::domain::{Line, LineId, Station};
use crate::planner::{DepartureBoard, Itinerary, ItineraryLeg, Waypoint};

// ============================================================================
// Templates
// ============================================================================

/// A journey plan.
#[derive(Template)]
#[template(path = "itinerary.txt")]
pub struct ItineraryTemplate {
    pub origin: WaypointView,
    pub legs: Vec<LegView>,
    /// Linked station walked to after the last ride.
    pub final_walk: Option<WaypointView>,
    pub distance: String,
    pub minutes: i64,
    pub currency: String,
    pub fare: u32,
}

/// Next arrivals at a station.
#[derive(Template)]
#[template(path = "board.txt")]
pub struct BoardTemplate {
    pub line: String,
    pub station: String,
    pub from: String,
    pub service_not_started: bool,
    pub directions: Vec<DirectionView>,
}

/// The loaded lines.
#[derive(Template)]
#[template(path = "lines.txt")]
pub struct LinesTemplate {
    pub lines: Vec<LineView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Station view model for templates.
#[derive(Debug, Clone)]
pub struct WaypointView {
    pub station: String,
    pub line: String,
    pub layout: String,
    pub parking: String,
}

impl WaypointView {
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            station: waypoint.station.clone(),
            line: waypoint.line.clone(),
            layout: waypoint.layout.to_string(),
            parking: waypoint.parking.to_string(),
        }
    }
}

/// Leg view model for templates.
#[derive(Debug, Clone)]
pub struct LegView {
    /// Set when the leg starts with a change: the line changed to, and the
    /// station walked to when it differs from the one the rider is at.
    pub transfer_to: Option<String>,
    pub departs: String,
    pub arrival: String,
    pub alight: WaypointView,
}

impl LegView {
    fn first(leg: &ItineraryLeg) -> Self {
        Self {
            transfer_to: None,
            departs: format!("Next metro at {}", leg.next_train),
            arrival: leg.arrival.to_string(),
            alight: WaypointView::from_waypoint(&leg.alight),
        }
    }

    /// A leg reached by changing lines, or by walking from `at` to a linked
    /// station.
    fn connecting(leg: &ItineraryLeg, at: &str) -> Self {
        let transfer_to = if at == leg.board.station {
            leg.line_name.clone()
        } else {
            format!("{} at {}", leg.line_name, leg.board.station)
        };
        let board = WaypointView::from_waypoint(&leg.board);

        Self {
            transfer_to: Some(transfer_to),
            departs: format!(
                "Next {} metro departs at {}, layout - {}, Parking - {}",
                leg.line_name, leg.next_train, board.layout, board.parking
            ),
            arrival: leg.arrival.to_string(),
            alight: WaypointView::from_waypoint(&leg.alight),
        }
    }
}

impl ItineraryTemplate {
    /// Create from a timed itinerary.
    pub fn from_itinerary(itinerary: &Itinerary, currency: &str) -> Self {
        let mut at = itinerary.origin.station.as_str();
        let mut legs = Vec::with_capacity(itinerary.legs.len());
        for (idx, leg) in itinerary.legs.iter().enumerate() {
            legs.push(if idx == 0 && leg.board.station == at {
                LegView::first(leg)
            } else {
                LegView::connecting(leg, at)
            });
            at = leg.alight.station.as_str();
        }

        let final_walk = (at != itinerary.destination.station)
            .then(|| WaypointView::from_waypoint(&itinerary.destination));

        Self {
            origin: WaypointView::from_waypoint(&itinerary.origin),
            legs,
            final_walk,
            distance: format!("{:.2}", itinerary.distance_km),
            minutes: itinerary.travel_minutes(),
            currency: currency.to_string(),
            fare: itinerary.fare,
        }
    }
}

/// Direction view model for templates.
#[derive(Debug, Clone)]
pub struct DirectionView {
    pub towards: String,
    /// Comma-separated arrival times; empty when no trains remain.
    pub arrivals: String,
}

impl BoardTemplate {
    /// Create from a departure board.
    pub fn from_board(board: &DepartureBoard) -> Self {
        let directions = board
            .directions
            .iter()
            .map(|d| DirectionView {
                towards: d.towards.clone(),
                arrivals: d
                    .arrivals
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        Self {
            line: board.line.clone(),
            station: board.station.clone(),
            from: board.from.to_string(),
            service_not_started: board.service_not_started,
            directions,
        }
    }
}

/// Line view model for templates.
#[derive(Debug, Clone)]
pub struct LineView {
    pub name: String,
    pub stations: usize,
    pub first: String,
    pub last: String,
    /// Stations offering a change, each with the lines or linked stations
    /// reachable there; empty when there are none.
    pub interchanges: String,
}

impl LinesTemplate {
    /// Create from the loaded dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let name_of = |station: Option<&Station>| {
            station.map_or_else(|| "-".to_string(), |s| s.name.clone())
        };
        let lines = dataset
            .iter()
            .map(|(id, line)| LineView {
                name: line.name().to_string(),
                stations: line.len(),
                first: name_of(line.first()),
                last: name_of(line.last()),
                interchanges: interchanges_on(dataset, id, line),
            })
            .collect();

        Self { lines }
    }
}

fn interchanges_on(dataset: &Dataset, id: LineId, line: &Line) -> String {
    let edges = dataset.interchanges();
    line.stations()
        .iter()
        .filter_map(|station| {
            let mut targets: Vec<String> = edges
                .linked_lines(&station.name)
                .filter(|other| *other != id)
                .filter_map(|other| dataset.line(other))
                .map(Line::display_name)
                .collect();
            targets.extend(edges.linked_stations(&station.name).map(str::to_string));
            (!targets.is_empty()).then(|| format!("{} ({})", station.name, targets.join(", ")))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixture;
    use crate::domain::ClockTime;
    use crate::planner::{
        BoardRequest, FrequencySchedule, JourneyRequest, Planner, PlannerConfig,
    };

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn render_plan(from: &str, to: &str, at: &str) -> String {
        let dataset = fixture::network();
        let config = PlannerConfig::default();
        let schedule = FrequencySchedule::from_config(&config);
        let planner = Planner::new(&dataset, &schedule, &config);
        let itinerary = planner.plan(&JourneyRequest::new(from, to, t(at))).unwrap();
        ItineraryTemplate::from_itinerary(&itinerary, &config.currency)
            .render()
            .unwrap()
    }

    fn lines_of(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn direct_plan_output() {
        let text = render_plan("Alpha", "Delta", "09:18");

        assert_eq!(
            lines_of(&text),
            vec![
                "Journey Plan:",
                "Start at Alpha (Red Line), layout - Elevated, Parking - Yes",
                "Next metro at 09:20",
                "Arrive at Delta at 09:27, layout - At-Grade, Parking - No",
                "Total distance: 4.50 km",
                "Total travel time: 9 minutes",
                "Fare: ₹20",
            ]
        );
    }

    #[test]
    fn transfer_plan_output() {
        let text = render_plan("Alpha", "South", "09:18");

        assert_eq!(
            lines_of(&text),
            vec![
                "Journey Plan:",
                "Start at Alpha (Red Line), layout - Elevated, Parking - Yes",
                "Next metro at 09:20",
                "Arrive at Central at 09:25, layout - Underground, Parking - Yes",
                "Transfer to Blue Line",
                "Next Blue Line metro departs at 09:27, layout - Underground, Parking - Yes",
                "Arrive at South at 09:31, layout - Elevated, Parking - Yes",
                "Total distance: 3.50 km",
                "Total travel time: 13 minutes",
                "Fare: ₹20",
            ]
        );
    }

    #[test]
    fn linked_transfer_names_the_station() {
        let text = render_plan("Quay", "Outer", "12:00");
        assert!(text.contains("Transfer to Orange Line at Delta Park\n"));
    }

    #[test]
    fn walk_to_linked_start() {
        let text = render_plan("Harbour", "Outer", "12:00");

        assert_eq!(
            lines_of(&text),
            vec![
                "Journey Plan:",
                "Start at Harbour (Green Line), layout - Elevated, Parking - No",
                "Transfer to Orange Line at Delta Park",
                "Next Orange Line metro departs at 12:08, layout - Underground, Parking - No",
                "Arrive at Outer at 12:14, layout - Elevated, Parking - Yes",
                "Total distance: 5.00 km",
                "Total travel time: 14 minutes",
                "Fare: ₹20",
            ]
        );
    }

    #[test]
    fn walk_to_linked_destination() {
        let text = render_plan("Quay", "Delta Park", "12:00");

        assert_eq!(
            lines_of(&text),
            vec![
                "Journey Plan:",
                "Start at Quay (Green Line), layout - At-Grade, Parking - No",
                "Next metro at 12:00",
                "Arrive at Harbour at 12:05, layout - Elevated, Parking - No",
                "Walk to Delta Park (Orange Line), layout - Underground, Parking - No",
                "Total distance: 4.00 km",
                "Total travel time: 7 minutes",
                "Fare: ₹20",
            ]
        );
    }

    #[test]
    fn walk_only_plan() {
        let text = render_plan("Harbour", "Delta Park", "12:00");
        assert!(!text.contains("no train needed"));
        assert!(text.contains("Walk to Delta Park (Orange Line)"));
        assert!(text.contains("Total travel time: 2 minutes\n"));
    }

    #[test]
    fn zero_hop_plan_output() {
        let text = render_plan("Central", "Central", "09:18");
        assert!(text.contains("Already at Central; no train needed.\n"));
        assert!(text.contains("Total travel time: 0 minutes\n"));
        assert!(text.contains("Fare: ₹10"));
    }

    fn render_board(line: &str, station: &str, at: &str) -> String {
        let dataset = fixture::network();
        let config = PlannerConfig::default();
        let schedule = FrequencySchedule::from_config(&config);
        let planner = Planner::new(&dataset, &schedule, &config);
        let board = planner
            .board(&BoardRequest::new(line, station, t(at)))
            .unwrap();
        BoardTemplate::from_board(&board).render().unwrap()
    }

    #[test]
    fn board_output() {
        let text = render_board("red", "bravo", "09:18");

        assert!(text.starts_with("Line: Red Line\nStation: Bravo\nCurrent time: 09:18\n"));
        assert!(text.contains("Trains towards Delta:\n  09:18, 09:22, 09:26, 09:30, 09:34, 09:38\n"));
        assert!(text.contains("Trains towards Alpha:\n  09:20, "));
        assert!(!text.contains("Service hasn't started"));
    }

    #[test]
    fn board_before_service() {
        let text = render_board("red", "alpha", "05:00");
        assert!(text.starts_with("Service hasn't started. First trains at 06:00.\n"));
        assert!(text.contains("Current time: 06:00\n"));
    }

    #[test]
    fn board_with_no_trains_left() {
        // The 22:52 from Delta reaches Alpha at 22:58; the 23:00 would
        // arrive after the service end.
        let text = render_board("red", "alpha", "22:59");
        assert!(text.contains("No more trains towards Alpha today.\n"));
        assert!(text.contains("Trains towards Delta:\n  23:00\n"));
    }

    #[test]
    fn lines_output() {
        let text = LinesTemplate::from_dataset(&fixture::network()).render().unwrap();

        assert_eq!(
            lines_of(&text),
            vec![
                "RED LINE: 4 stations, Alpha - Delta",
                "  Interchanges: Central (Blue Line)",
                "BLUE LINE: 3 stations, North - South",
                "  Interchanges: Central (Red Line)",
                "GREEN LINE: 2 stations, Quay - Harbour",
                "  Interchanges: Harbour (Delta Park)",
                "ORANGE LINE - EXTENSION: 2 stations, Delta Park - Outer",
                "  Interchanges: Delta Park (Harbour)",
                "GREY LINE: 2 stations, Island - Lagoon",
            ]
        );
    }
}
