//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once from the input datasets and shared read-only
//! - exported to JSON (chart specs, query results)
//! - rendered by any front-end (ASCII, TUI, Markdown)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One row of the routes table after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub route_name: String,
    /// Raw fare as displayed in the source (e.g. `$150`).
    pub fare_structure: String,
    /// Numeric fare derived from `fare_structure`; `None` when it does not parse.
    pub fare: Option<f64>,
    pub distance_km: Option<f64>,
    pub buses_available: Option<f64>,
    /// `destinations` (or the alternate `destination`) column, when present and non-blank.
    pub destinations: Option<String>,
}

impl RouteRecord {
    /// Fare string for display, always carrying a currency symbol; `N/A` when blank.
    pub fn fare_display(&self) -> String {
        if self.fare_structure.trim().is_empty() {
            "N/A".to_string()
        } else if self.fare_structure.contains('$') {
            self.fare_structure.clone()
        } else {
            format!("${}", self.fare_structure)
        }
    }
}

/// One row of the fuel table after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelRecord {
    /// `None` when blank; the row still counts toward depot totals.
    pub route: Option<String>,
    /// `None` when blank; the row still counts toward route totals.
    pub depot: Option<String>,
    /// Upper-cased fuel type (`ELECTRIC`, `CNG`, `DIESEL`, or passed through).
    pub fuel_type: String,
}

/// A row skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Normalized routes table.
#[derive(Debug, Clone, Default)]
pub struct RoutesTable {
    pub records: Vec<RouteRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Normalized fuel table.
#[derive(Debug, Clone, Default)]
pub struct FuelTable {
    pub records: Vec<FuelRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// The fuel categories the dashboard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    Electric,
    Cng,
    Diesel,
}

impl FuelKind {
    pub const ALL: [FuelKind; 3] = [FuelKind::Electric, FuelKind::Cng, FuelKind::Diesel];

    /// Case-normalized value stored in `FuelRecord::fuel_type`.
    pub fn label(self) -> &'static str {
        match self {
            FuelKind::Electric => "ELECTRIC",
            FuelKind::Cng => "CNG",
            FuelKind::Diesel => "DIESEL",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FuelKind::Electric => "EV",
            FuelKind::Cng => "CNG",
            FuelKind::Diesel => "Diesel",
        }
    }
}

/// Counts per category key.
///
/// Ordering is decided by the producer: per-route aggregates are sorted by
/// descending count (ties: smallest key first), per-depot aggregates by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyAggregate {
    pub entries: Vec<(String, usize)>,
}

impl FrequencyAggregate {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| *n)
    }
}

/// Route with the most buses of a fuel type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryLeader {
    Leader { key: String, count: usize },
    NoData,
}

impl CategoryLeader {
    pub fn key(&self) -> &str {
        match self {
            CategoryLeader::Leader { key, .. } => key,
            CategoryLeader::NoData => "N/A",
        }
    }

    pub fn count(&self) -> usize {
        match self {
            CategoryLeader::Leader { count, .. } => *count,
            CategoryLeader::NoData => 0,
        }
    }
}

/// Rendering primitive for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    Histogram,
    Pie,
    Scatter,
    Line,
    Stem,
    HorizontalBar,
}

/// Every chart the dashboard can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    FareBar,
    FareHistogram,
    DistanceBar,
    DistanceHistogram,
    FareScatter,
    SortedDistanceLine,
    EvPie,
    CngBar,
    DieselStem,
    EvDepot,
    CngDepot,
    DieselDepot,
}

impl ChartKind {
    pub const ROUTES: [ChartKind; 6] = [
        ChartKind::FareBar,
        ChartKind::FareHistogram,
        ChartKind::DistanceBar,
        ChartKind::DistanceHistogram,
        ChartKind::FareScatter,
        ChartKind::SortedDistanceLine,
    ];

    pub const FUEL: [ChartKind; 6] = [
        ChartKind::EvPie,
        ChartKind::CngBar,
        ChartKind::DieselStem,
        ChartKind::EvDepot,
        ChartKind::CngDepot,
        ChartKind::DieselDepot,
    ];

    /// Button-style name used by front-ends.
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::FareBar => "Fare Bar Chart",
            ChartKind::FareHistogram => "Fare Histogram",
            ChartKind::DistanceBar => "Distance Bar Chart",
            ChartKind::DistanceHistogram => "Distance Histogram",
            ChartKind::FareScatter => "Fare Scatter",
            ChartKind::SortedDistanceLine => "Sorted Distance Line",
            ChartKind::EvPie => "EV Pie Chart",
            ChartKind::CngBar => "CNG Bar Chart",
            ChartKind::DieselStem => "Diesel Stem Plot",
            ChartKind::EvDepot => "EV Depot Chart",
            ChartKind::CngDepot => "CNG Depot Pie",
            ChartKind::DieselDepot => "Diesel Depot Chart",
        }
    }
}

/// A (label, value) pair in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Fully resolved chart description, independent of the renderer.
///
/// Builders never produce a spec with an empty series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesPoint>,
}

impl ChartSpec {
    /// Slice shares in percent, in series order. Zero total yields zeros.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total: f64 = self.series.iter().map(|p| p.value).sum();
        self.series
            .iter()
            .map(|p| {
                let pct = if total > 0.0 { p.value / total * 100.0 } else { 0.0 };
                (p.label.clone(), pct)
            })
            .collect()
    }

    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in &self.series {
            min = min.min(p.value);
            max = max.max(p.value);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

/// A labelled scalar for the KPI cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Resolved run configuration.
///
/// This is derived from CLI flags, then `.env`/environment, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashConfig {
    pub routes_path: PathBuf,
    pub fuel_path: PathBuf,
}

pub const DEFAULT_ROUTES_CSV: &str = "depot_routes.csv";
pub const DEFAULT_FUEL_CSV: &str = "fuel_types.csv";
pub const ROUTES_ENV: &str = "DEPOT_ROUTES_CSV";
pub const FUEL_ENV: &str = "DEPOT_FUEL_CSV";

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(values: &[f64]) -> ChartSpec {
        ChartSpec {
            chart_type: ChartType::Pie,
            title: "t".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            series: values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint::new(format!("S{i}"), *v))
                .collect(),
        }
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let pct = spec(&[2.0, 1.0, 1.0]).percentages();
        assert!((pct[0].1 - 50.0).abs() < 1e-9);
        let total: f64 = pct.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn fare_display_adds_currency_once() {
        let mut record = RouteRecord {
            route_name: "R1".to_string(),
            fare_structure: "$150".to_string(),
            fare: Some(150.0),
            distance_km: None,
            buses_available: None,
            destinations: None,
        };
        assert_eq!(record.fare_display(), "$150");
        record.fare_structure = "150".to_string();
        assert_eq!(record.fare_display(), "$150");
        record.fare_structure = String::new();
        assert_eq!(record.fare_display(), "N/A");
    }

    #[test]
    fn no_data_leader_reports_zero() {
        assert_eq!(CategoryLeader::NoData.count(), 0);
        assert_eq!(CategoryLeader::NoData.key(), "N/A");
    }
}
