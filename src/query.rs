//! Free-text route lookup.

use serde::Serialize;

use crate::domain::{RouteRecord, RoutesTable};

/// Detail record for a matched route.
///
/// `destinations` is `None` when neither destination column had a value;
/// display code renders that as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetails {
    pub route: String,
    pub destinations: Option<String>,
    pub fare_structure: String,
    pub distance_km: Option<f64>,
    pub buses_available: Option<f64>,
}

impl From<&RouteRecord> for RouteDetails {
    fn from(record: &RouteRecord) -> Self {
        Self {
            route: record.route_name.clone(),
            destinations: record.destinations.clone(),
            fare_structure: record.fare_display(),
            distance_km: record.distance_km,
            buses_available: record.buses_available,
        }
    }
}

/// Result of a route query: a match, or an explicit miss carrying the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Found(RouteDetails),
    NotFound { query: String },
}

/// First route (table order) whose name contains `query`, ignoring case.
///
/// The query is matched literally, not as a pattern.
pub fn resolve_route(routes: &RoutesTable, query: &str) -> QueryOutcome {
    let needle = query.to_lowercase();
    routes
        .records
        .iter()
        .find(|r| r.route_name.to_lowercase().contains(&needle))
        .map(|r| QueryOutcome::Found(RouteDetails::from(r)))
        .unwrap_or_else(|| QueryOutcome::NotFound {
            query: query.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> RoutesTable {
        let records = vec![
            RouteRecord {
                route_name: "Route 1".to_string(),
                fare_structure: "$100".to_string(),
                fare: Some(100.0),
                distance_km: Some(5.0),
                buses_available: Some(2.0),
                destinations: Some("Half Way Tree".to_string()),
            },
            RouteRecord {
                route_name: "Route 10".to_string(),
                fare_structure: "120".to_string(),
                fare: Some(120.0),
                distance_km: Some(8.5),
                buses_available: Some(3.0),
                destinations: None,
            },
        ];
        RoutesTable {
            rows_read: records.len(),
            records,
            row_errors: Vec::new(),
        }
    }

    #[test]
    fn match_is_case_insensitive_and_first_wins() {
        let QueryOutcome::Found(details) = resolve_route(&routes(), "route 1") else {
            panic!("expected a match");
        };
        assert_eq!(details.route, "Route 1");
        assert_eq!(details.destinations.as_deref(), Some("Half Way Tree"));
        assert_eq!(details.fare_structure, "$100");
    }

    #[test]
    fn missing_destination_stays_distinct_from_miss() {
        let QueryOutcome::Found(details) = resolve_route(&routes(), "ROUTE 10") else {
            panic!("expected a match");
        };
        assert_eq!(details.destinations, None);
        assert_eq!(details.fare_structure, "$120");
    }

    #[test]
    fn blank_fare_shows_as_na() {
        let mut t = routes();
        t.records[0].fare_structure = String::new();
        t.records[0].fare = None;
        let QueryOutcome::Found(details) = resolve_route(&t, "Route 1") else {
            panic!("expected a match");
        };
        assert_eq!(details.fare_structure, "N/A");
    }

    #[test]
    fn miss_carries_query_verbatim() {
        let outcome = resolve_route(&routes(), "Express (99)");
        assert_eq!(
            outcome,
            QueryOutcome::NotFound {
                query: "Express (99)".to_string()
            }
        );
    }

    #[test]
    fn pattern_characters_are_literal() {
        assert!(matches!(resolve_route(&routes(), "Route .*"), QueryOutcome::NotFound { .. }));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let t = routes();
        assert_eq!(resolve_route(&t, "10"), resolve_route(&t, "10"));
        assert_eq!(resolve_route(&t, "zzz"), resolve_route(&t, "zzz"));
    }
}
