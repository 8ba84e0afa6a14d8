//! One builder per dashboard chart.

use crate::analytics::FuelSummary;
use crate::charts::histogram::{HISTOGRAM_BINS, histogram};
use crate::domain::{ChartKind, ChartSpec, ChartType, FrequencyAggregate, FuelKind, RouteRecord, RoutesTable, SeriesPoint};

/// Build any chart by kind.
pub fn build_chart(kind: ChartKind, routes: &RoutesTable, fuel: &FuelSummary) -> Option<ChartSpec> {
    match kind {
        ChartKind::FareBar => fare_bar(routes),
        ChartKind::FareHistogram => fare_histogram(routes),
        ChartKind::DistanceBar => distance_bar(routes),
        ChartKind::DistanceHistogram => distance_histogram(routes),
        ChartKind::FareScatter => fare_scatter(routes),
        ChartKind::SortedDistanceLine => sorted_distance_line(routes),
        ChartKind::EvPie => ev_pie(fuel.by_route(FuelKind::Electric)),
        ChartKind::CngBar => cng_bar(fuel.by_route(FuelKind::Cng)),
        ChartKind::DieselStem => diesel_stem(fuel.by_route(FuelKind::Diesel)),
        ChartKind::EvDepot => ev_depot(&fuel.by_depot(FuelKind::Electric)),
        ChartKind::CngDepot => cng_depot(&fuel.by_depot(FuelKind::Cng)),
        ChartKind::DieselDepot => diesel_depot(&fuel.by_depot(FuelKind::Diesel)),
    }
}

pub fn fare_bar(routes: &RoutesTable) -> Option<ChartSpec> {
    chart(
        ChartType::Bar,
        "Fare by Route",
        "Routes",
        "Fare",
        route_series(&routes.records, |r| r.fare),
    )
}

pub fn fare_histogram(routes: &RoutesTable) -> Option<ChartSpec> {
    chart(
        ChartType::Histogram,
        "Histogram of Fare",
        "Fare",
        "Frequency",
        histogram_series(&routes.records, |r| r.fare),
    )
}

pub fn distance_bar(routes: &RoutesTable) -> Option<ChartSpec> {
    chart(
        ChartType::Bar,
        "Distance (KM) by Route",
        "Routes",
        "Distance (KM)",
        route_series(&routes.records, |r| r.distance_km),
    )
}

pub fn distance_histogram(routes: &RoutesTable) -> Option<ChartSpec> {
    chart(
        ChartType::Histogram,
        "Histogram of Distance (KM)",
        "Distance (KM)",
        "Frequency",
        histogram_series(&routes.records, |r| r.distance_km),
    )
}

pub fn fare_scatter(routes: &RoutesTable) -> Option<ChartSpec> {
    chart(
        ChartType::Scatter,
        "Scatter: Fare by Route",
        "Routes",
        "Fare",
        route_series(&routes.records, |r| r.fare),
    )
}

/// Distance line over routes sorted ascending by distance (stable on ties).
pub fn sorted_distance_line(routes: &RoutesTable) -> Option<ChartSpec> {
    let mut series = route_series(&routes.records, |r| r.distance_km);
    series.sort_by(|a, b| a.value.total_cmp(&b.value));
    chart(ChartType::Line, "Line: Sorted Distance", "Routes", "Distance (KM)", series)
}

/// Electric buses per route; front-ends label slices with `ChartSpec::percentages`.
pub fn ev_pie(counts: &FrequencyAggregate) -> Option<ChartSpec> {
    chart(ChartType::Pie, "Electric Buses by Route", "Route", "Count", count_series(counts))
}

pub fn cng_bar(counts: &FrequencyAggregate) -> Option<ChartSpec> {
    chart(ChartType::Bar, "Number of CNG Buses by Route", "Route", "Count", count_series(counts))
}

/// Stems sit at ordinal positions; series labels become the x tick labels.
pub fn diesel_stem(counts: &FrequencyAggregate) -> Option<ChartSpec> {
    chart(ChartType::Stem, "Diesel Buses by Route", "Route", "Count", count_series(counts))
}

pub fn ev_depot(counts: &FrequencyAggregate) -> Option<ChartSpec> {
    chart(ChartType::Bar, "Electric Buses by Depot", "Depot", "Count", count_series(counts))
}

pub fn cng_depot(counts: &FrequencyAggregate) -> Option<ChartSpec> {
    chart(ChartType::Pie, "CNG Buses by Depot", "Depot", "Count", count_series(counts))
}

pub fn diesel_depot(counts: &FrequencyAggregate) -> Option<ChartSpec> {
    chart(
        ChartType::HorizontalBar,
        "Diesel Buses by Depot",
        "Count",
        "Depot",
        count_series(counts),
    )
}

fn chart(chart_type: ChartType, title: &str, x_label: &str, y_label: &str, series: Vec<SeriesPoint>) -> Option<ChartSpec> {
    if series.is_empty() {
        return None;
    }
    Some(ChartSpec {
        chart_type,
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        series,
    })
}

fn route_series(records: &[RouteRecord], value: impl Fn(&RouteRecord) -> Option<f64>) -> Vec<SeriesPoint> {
    records
        .iter()
        .filter_map(|r| value(r).map(|v| SeriesPoint::new(r.route_name.clone(), v)))
        .collect()
}

fn histogram_series(records: &[RouteRecord], value: impl Fn(&RouteRecord) -> Option<f64>) -> Vec<SeriesPoint> {
    let values: Vec<f64> = records.iter().filter_map(value).collect();
    histogram(&values, HISTOGRAM_BINS)
        .into_iter()
        .map(|bin| SeriesPoint::new(bin.label(), bin.count as f64))
        .collect()
}

fn count_series(counts: &FrequencyAggregate) -> Vec<SeriesPoint> {
    counts
        .entries
        .iter()
        .map(|(key, n)| SeriesPoint::new(key.clone(), *n as f64))
        .collect()
}
