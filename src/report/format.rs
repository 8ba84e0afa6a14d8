//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - every front-end (CLI, TUI, Markdown) shows the same strings

use crate::analytics::{FuelSummary, RouteMetrics};
use crate::domain::{FuelKind, Kpi};
use crate::query::{QueryOutcome, RouteDetails};

/// The five route KPI cards.
pub fn route_kpis(metrics: &RouteMetrics) -> Vec<Kpi> {
    vec![
        Kpi::new(
            "Most Expensive Fare",
            format!(
                "{} - {}",
                metrics.most_expensive.record.route_name,
                metrics.most_expensive.record.fare_display()
            ),
        ),
        Kpi::new(
            "Shortest Distance",
            format!(
                "{} - {} km",
                metrics.shortest_distance.record.route_name,
                fmt_number(metrics.shortest_distance.value)
            ),
        ),
        Kpi::new(
            "Longest Distance",
            format!(
                "{} - {} km",
                metrics.longest_distance.record.route_name,
                fmt_number(metrics.longest_distance.value)
            ),
        ),
        Kpi::new(
            "Most Buses Available",
            format!(
                "{} - {}",
                metrics.most_buses.record.route_name,
                fmt_number(metrics.most_buses.value)
            ),
        ),
        Kpi::new(
            "Least Buses Available",
            format!(
                "{} - {}",
                metrics.least_buses.record.route_name,
                fmt_number(metrics.least_buses.value)
            ),
        ),
    ]
}

/// One card per fuel kind: route with the most buses and its count.
pub fn fuel_leader_kpis(summary: &FuelSummary) -> Vec<Kpi> {
    FuelKind::ALL
        .iter()
        .map(|&kind| {
            let leader = summary.leader(kind);
            Kpi::new(
                format!("Route w/ Most {} Buses", kind.display_name()),
                format!("{} ({})", leader.key(), leader.count()),
            )
        })
        .collect()
}

/// Render KPI cards as an aligned two-column block.
pub fn format_kpis(heading: &str, kpis: &[Kpi]) -> String {
    let width = kpis.iter().map(|k| k.label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(heading);
    out.push('\n');
    for kpi in kpis {
        out.push_str(&format!("  {:<width$}  {}\n", kpi.label, kpi.value));
    }
    out
}

/// Render a query outcome as the detail record or the not-found message.
pub fn format_query_outcome(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Found(details) => format_route_details(details),
        QueryOutcome::NotFound { query } => format!("No route found matching '{query}'."),
    }
}

pub fn format_route_details(details: &RouteDetails) -> String {
    format!(
        "Route: {}\nDestinations: {}\nFare Structure: {}\nDistance (KM): {} km\nBuses Available: {}",
        details.route,
        details.destinations.as_deref().unwrap_or("N/A"),
        details.fare_structure,
        fmt_opt_number(details.distance_km),
        fmt_opt_number(details.buses_available),
    )
}

/// Integers without a trailing `.0`, everything else as-is.
pub fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

pub fn fmt_opt_number(v: Option<f64>) -> String {
    v.map(fmt_number).unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute_route_metrics;
    use crate::domain::{FuelRecord, FuelTable, RouteRecord, RoutesTable};

    fn route(name: &str, fare: &str, distance: f64, buses: f64) -> RouteRecord {
        RouteRecord {
            route_name: name.to_string(),
            fare_structure: fare.to_string(),
            fare: crate::io::parse_fare(fare),
            distance_km: Some(distance),
            buses_available: Some(buses),
            destinations: None,
        }
    }

    #[test]
    fn route_kpis_match_scenario() {
        let table = RoutesTable {
            records: vec![route("R1", "$100", 5.0, 2.0), route("R2", "$50", 10.0, 4.0)],
            row_errors: Vec::new(),
            rows_read: 2,
        };
        let kpis = route_kpis(&compute_route_metrics(&table).unwrap());
        let values: Vec<&str> = kpis.iter().map(|k| k.value.as_str()).collect();
        assert_eq!(
            values,
            ["R1 - $100", "R1 - 5 km", "R2 - 10 km", "R2 - 4", "R1 - 2"]
        );
        assert_eq!(kpis[0].label, "Most Expensive Fare");
    }

    #[test]
    fn fuel_leaders_report_no_data() {
        let table = FuelTable {
            records: vec![FuelRecord {
                route: Some("R1".to_string()),
                depot: Some("D1".to_string()),
                fuel_type: "ELECTRIC".to_string(),
            }],
            row_errors: Vec::new(),
            rows_read: 1,
        };
        let kpis = fuel_leader_kpis(&FuelSummary::from_table(&table));
        assert_eq!(kpis[0], Kpi::new("Route w/ Most EV Buses", "R1 (1)"));
        assert_eq!(kpis[1], Kpi::new("Route w/ Most CNG Buses", "N/A (0)"));
        assert_eq!(kpis[2], Kpi::new("Route w/ Most Diesel Buses", "N/A (0)"));
    }

    #[test]
    fn kpi_block_is_aligned() {
        let txt = format_kpis("Fuel", &[Kpi::new("A", "1"), Kpi::new("Long", "2")]);
        assert_eq!(txt, "Fuel\n  A     1\n  Long  2\n");
    }

    #[test]
    fn details_fall_back_to_na() {
        let details = RouteDetails {
            route: "Route 7".to_string(),
            destinations: None,
            fare_structure: "$90".to_string(),
            distance_km: Some(12.5),
            buses_available: None,
        };
        assert_eq!(
            format_route_details(&details),
            "Route: Route 7\nDestinations: N/A\nFare Structure: $90\nDistance (KM): 12.5 km\nBuses Available: N/A"
        );
    }

    #[test]
    fn not_found_message_quotes_query() {
        let outcome = QueryOutcome::NotFound { query: "xyz".to_string() };
        assert_eq!(format_query_outcome(&outcome), "No route found matching 'xyz'.");
    }

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(fmt_number(4.0), "4");
        assert_eq!(fmt_number(8.25), "8.25");
        assert_eq!(fmt_opt_number(None), "N/A");
    }
}
