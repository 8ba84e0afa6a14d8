//! Extremal records over the routes table.

use serde::Serialize;

use crate::domain::{RouteRecord, RoutesTable};
use crate::error::AppError;

/// Numeric route column an extremal query runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteColumn {
    Fare,
    Distance,
    Buses,
}

impl RouteColumn {
    pub fn value(self, record: &RouteRecord) -> Option<f64> {
        match self {
            RouteColumn::Fare => record.fare,
            RouteColumn::Distance => record.distance_km,
            RouteColumn::Buses => record.buses_available,
        }
    }

    pub fn column_name(self) -> &'static str {
        match self {
            RouteColumn::Fare => "fare",
            RouteColumn::Distance => "distance (km)",
            RouteColumn::Buses => "buses available",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

/// A row achieving the max/min of a column, with that value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremal {
    pub record: RouteRecord,
    pub value: f64,
}

/// The five extremal records shown as KPI cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub most_expensive: Extremal,
    pub shortest_distance: Extremal,
    pub longest_distance: Extremal,
    pub most_buses: Extremal,
    pub least_buses: Extremal,
}

/// Compute all five extremal records.
///
/// Fails (exit code 3) when a column has no numeric value at all, which also
/// covers an empty table.
pub fn compute_route_metrics(table: &RoutesTable) -> Result<RouteMetrics, AppError> {
    let records = &table.records;
    Ok(RouteMetrics {
        most_expensive: require_extremal(records, RouteColumn::Fare, Extreme::Max)?,
        shortest_distance: require_extremal(records, RouteColumn::Distance, Extreme::Min)?,
        longest_distance: require_extremal(records, RouteColumn::Distance, Extreme::Max)?,
        most_buses: require_extremal(records, RouteColumn::Buses, Extreme::Max)?,
        least_buses: require_extremal(records, RouteColumn::Buses, Extreme::Min)?,
    })
}

/// First row (in table order) holding the max/min of `column`.
///
/// Rows with a missing value are ignored; `None` if every value is missing.
pub fn select_extremal(records: &[RouteRecord], column: RouteColumn, extreme: Extreme) -> Option<Extremal> {
    let mut best: Option<(&RouteRecord, f64)> = None;

    for record in records {
        let Some(v) = column.value(record) else { continue };
        let better = match best {
            None => true,
            // Strict comparison keeps the earliest row on ties.
            Some((_, cur)) => match extreme {
                Extreme::Max => v > cur,
                Extreme::Min => v < cur,
            },
        };
        if better {
            best = Some((record, v));
        }
    }

    best.map(|(record, value)| Extremal {
        record: record.clone(),
        value,
    })
}

fn require_extremal(records: &[RouteRecord], column: RouteColumn, extreme: Extreme) -> Result<Extremal, AppError> {
    select_extremal(records, column, extreme).ok_or_else(|| {
        AppError::new(
            3,
            format!("Column `{}` has no numeric values; cannot compute route metrics.", column.column_name()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, fare: Option<f64>, distance: Option<f64>, buses: Option<f64>) -> RouteRecord {
        RouteRecord {
            route_name: name.to_string(),
            fare_structure: fare.map(|f| format!("${f}")).unwrap_or_default(),
            fare,
            distance_km: distance,
            buses_available: buses,
            destinations: None,
        }
    }

    fn table(records: Vec<RouteRecord>) -> RoutesTable {
        RoutesTable {
            rows_read: records.len(),
            records,
            row_errors: Vec::new(),
        }
    }

    #[test]
    fn two_route_scenario() {
        let t = table(vec![
            route("R1", Some(100.0), Some(5.0), Some(2.0)),
            route("R2", Some(50.0), Some(10.0), Some(4.0)),
        ]);
        let m = compute_route_metrics(&t).unwrap();
        assert_eq!(m.most_expensive.record.route_name, "R1");
        assert_eq!(m.most_expensive.value, 100.0);
        assert_eq!(m.shortest_distance.record.route_name, "R1");
        assert_eq!(m.longest_distance.record.route_name, "R2");
        assert_eq!(m.most_buses.record.route_name, "R2");
        assert_eq!(m.most_buses.value, 4.0);
        assert_eq!(m.least_buses.record.route_name, "R1");
    }

    #[test]
    fn single_row_wins_everything() {
        let t = table(vec![route("Only", Some(10.0), Some(1.0), Some(1.0))]);
        let m = compute_route_metrics(&t).unwrap();
        for e in [
            &m.most_expensive,
            &m.shortest_distance,
            &m.longest_distance,
            &m.most_buses,
            &m.least_buses,
        ] {
            assert_eq!(e.record.route_name, "Only");
        }
    }

    #[test]
    fn ties_keep_first_row() {
        let records = vec![
            route("A", Some(5.0), Some(3.0), Some(1.0)),
            route("B", Some(5.0), Some(3.0), Some(1.0)),
        ];
        let max = select_extremal(&records, RouteColumn::Fare, Extreme::Max).unwrap();
        let min = select_extremal(&records, RouteColumn::Distance, Extreme::Min).unwrap();
        assert_eq!(max.record.route_name, "A");
        assert_eq!(min.record.route_name, "A");
    }

    #[test]
    fn missing_values_are_skipped() {
        let records = vec![
            route("A", None, Some(3.0), Some(1.0)),
            route("B", Some(7.0), None, Some(1.0)),
        ];
        let max = select_extremal(&records, RouteColumn::Fare, Extreme::Max).unwrap();
        assert_eq!(max.record.route_name, "B");
        let min = select_extremal(&records, RouteColumn::Distance, Extreme::Min).unwrap();
        assert_eq!(min.record.route_name, "A");
    }

    #[test]
    fn all_missing_column_is_an_error() {
        let t = table(vec![route("A", None, Some(1.0), Some(1.0))]);
        let err = compute_route_metrics(&t).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("`fare`"));

        let empty = table(Vec::new());
        assert!(compute_route_metrics(&empty).is_err());
    }
}
