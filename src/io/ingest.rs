//! CSV ingest and normalization.
//!
//! This module is responsible for turning the two exported spreadsheets
//! (depot routes and fuel types) into clean, typed tables.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip unusable rows, but report what happened)
//! - **Lenient values**: numbers that do not parse become missing, never errors
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{FuelRecord, FuelTable, RouteRecord, RoutesTable, RowError};
use crate::error::AppError;

pub const COL_ROUTES: &str = "routes";
pub const COL_FARE_STRUCTURE: &str = "fare structure";
pub const COL_DISTANCE: &str = "distance (km)";
pub const COL_BUSES: &str = "buses available";
pub const COL_DESTINATIONS: &str = "destinations";
pub const COL_DESTINATION: &str = "destination";

pub const COL_FUEL_TYPE: &str = "fuel type";
pub const COL_ROUTE: &str = "route";
pub const COL_DEPOT: &str = "depot";

const ROUTES_REQUIRED: [&str; 4] = [COL_ROUTES, COL_FARE_STRUCTURE, COL_DISTANCE, COL_BUSES];
const FUEL_REQUIRED: [&str; 3] = [COL_FUEL_TYPE, COL_ROUTE, COL_DEPOT];

/// Load and normalize the routes CSV.
pub fn load_routes(path: &Path) -> Result<RoutesTable, AppError> {
    let file = open_csv(path, "routes")?;
    read_routes(file, &path.display().to_string())
}

/// Load and normalize the fuel-types CSV.
pub fn load_fuel(path: &Path) -> Result<FuelTable, AppError> {
    let file = open_csv(path, "fuel")?;
    read_fuel(file, &path.display().to_string())
}

/// Normalize routes from any reader. `source` is only used in messages.
pub fn read_routes<R: Read>(reader: R, source: &str) -> Result<RoutesTable, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns_exist(&header_map, &ROUTES_REQUIRED, source)?;

    let mut table = RoutesTable::default();

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line and lines are 1-based.
        let line = idx + 2;
        table.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                table.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_route_row(&record, &header_map) {
            Ok(row) => table.records.push(row),
            Err(message) => table.row_errors.push(RowError { line, message }),
        }
    }

    log_load_summary("routes", source, table.rows_read, table.records.len(), &table.row_errors);

    if table.records.is_empty() {
        return Err(AppError::new(
            3,
            format!("No valid rows in routes file '{source}'."),
        ));
    }

    Ok(table)
}

/// Normalize fuel records from any reader. `source` is only used in messages.
///
/// An empty fuel table is valid: every fuel leader then reports no data.
pub fn read_fuel<R: Read>(reader: R, source: &str) -> Result<FuelTable, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns_exist(&header_map, &FUEL_REQUIRED, source)?;

    let mut table = FuelTable::default();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        table.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                table.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_fuel_row(&record, &header_map) {
            Ok(row) => table.records.push(row),
            Err(message) => table.row_errors.push(RowError { line, message }),
        }
    }

    log_load_summary("fuel", source, table.rows_read, table.records.len(), &table.row_errors);

    Ok(table)
}

/// Standardize a column name: trim, lower-case, collapse inner whitespace.
pub fn normalize_column_name(name: &str) -> String {
    // Excel exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse a currency-like fare (`"$1,234"` -> `1234.0`).
///
/// Anything that is not a finite number after stripping `$` and `,` is missing.
pub fn parse_fare(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    parse_number(&cleaned)
}

/// Upper-case a fuel type for category matching.
pub fn normalize_fuel_type(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn open_csv(path: &Path, what: &str) -> Result<File, AppError> {
    File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open {what} CSV '{}': {e}", path.display()),
        )
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_header_map<R: Read>(
    reader: &mut csv::Reader<R>,
    source: &str,
) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers in '{source}': {e}")))?
        .clone();
    Ok(build_header_map(&headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_column_name(name)).or_insert(idx);
    }
    map
}

fn ensure_columns_exist(
    header_map: &HashMap<String, usize>,
    required: &[&str],
    source: &str,
) -> Result<(), AppError> {
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(
                2,
                format!("Missing required column `{name}` in '{source}'."),
            ));
        }
    }
    Ok(())
}

fn parse_route_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RouteRecord, String> {
    let route_name = get_required(record, header_map, COL_ROUTES)?.to_string();
    let fare_structure = get_optional(record, header_map, COL_FARE_STRUCTURE)
        .unwrap_or_default()
        .to_string();
    let fare = parse_fare(&fare_structure);
    let distance_km = get_optional(record, header_map, COL_DISTANCE).and_then(parse_number);
    let buses_available = get_optional(record, header_map, COL_BUSES).and_then(parse_number);

    let destinations = get_optional(record, header_map, COL_DESTINATIONS)
        .or_else(|| get_optional(record, header_map, COL_DESTINATION))
        .map(str::to_string);

    Ok(RouteRecord {
        route_name,
        fare_structure,
        fare,
        distance_km,
        buses_available,
        destinations,
    })
}

fn parse_fuel_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<FuelRecord, String> {
    let fuel_type = normalize_fuel_type(get_required(record, header_map, COL_FUEL_TYPE)?);
    let route = get_optional(record, header_map, COL_ROUTE).map(str::to_string);
    let depot = get_optional(record, header_map, COL_DEPOT).map(str::to_string);

    Ok(FuelRecord {
        route,
        depot,
        fuel_type,
    })
}

fn log_load_summary(what: &str, source: &str, rows_read: usize, rows_used: usize, errors: &[RowError]) {
    info!(table = what, source, rows_read, rows_used, "loaded table");
    if !errors.is_empty() {
        warn!(
            table = what,
            source,
            skipped = errors.len(),
            "skipped rows during load (first at line {})",
            errors[0].line
        );
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTES_CSV: &str = "\
\u{feff} Routes ,Fare  Structure,Distance (KM),Buses Available,Destinations
Route 1,$100,5,2,Downtown
Route 2,\"$1,250\",10,4,
,$80,3,1,Nowhere
Route 3,free,abc,,Uptown
";

    #[test]
    fn column_names_are_trimmed_lowered_and_collapsed() {
        assert_eq!(normalize_column_name("  Fare   Structure "), "fare structure");
        assert_eq!(normalize_column_name("\u{feff}Routes"), "routes");
        assert_eq!(normalize_column_name("Distance\t(KM)"), "distance (km)");
    }

    #[test]
    fn fare_strips_currency_and_separators() {
        assert_eq!(parse_fare("$1,234"), Some(1234.0));
        assert_eq!(parse_fare("150"), Some(150.0));
        assert_eq!(parse_fare(" $ 99.5 "), Some(99.5));
        assert_eq!(parse_fare("abc"), None);
        assert_eq!(parse_fare(""), None);
        assert_eq!(parse_fare("$inf"), None);
    }

    #[test]
    fn fuel_type_is_upper_cased() {
        assert_eq!(normalize_fuel_type(" Electric "), "ELECTRIC");
        assert_eq!(normalize_fuel_type("cng"), "CNG");
        assert_eq!(normalize_fuel_type("Hydrogen"), "HYDROGEN");
    }

    #[test]
    fn routes_are_normalized_and_bad_rows_skipped() {
        let table = read_routes(ROUTES_CSV.as_bytes(), "routes.csv").unwrap();
        assert_eq!(table.rows_read, 4);
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.row_errors.len(), 1);
        assert_eq!(table.row_errors[0].line, 4);

        let r1 = &table.records[0];
        assert_eq!(r1.route_name, "Route 1");
        assert_eq!(r1.fare, Some(100.0));
        assert_eq!(r1.distance_km, Some(5.0));
        assert_eq!(r1.buses_available, Some(2.0));
        assert_eq!(r1.destinations.as_deref(), Some("Downtown"));

        let r2 = &table.records[1];
        assert_eq!(r2.fare_structure, "$1,250");
        assert_eq!(r2.fare, Some(1250.0));
        assert_eq!(r2.destinations, None);

        let r3 = &table.records[2];
        assert_eq!(r3.fare, None);
        assert_eq!(r3.distance_km, None);
        assert_eq!(r3.buses_available, None);
    }

    #[test]
    fn alternate_destination_column_is_used() {
        let csv = "routes,fare structure,distance (km),buses available,destination\nR1,$1,1,1,Port\n";
        let table = read_routes(csv.as_bytes(), "routes.csv").unwrap();
        assert_eq!(table.records[0].destinations.as_deref(), Some("Port"));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "routes,fare structure,buses available\nR1,$1,1\n";
        let err = read_routes(csv.as_bytes(), "routes.csv").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("distance (km)"));
        assert!(err.message().contains("routes.csv"));
    }

    #[test]
    fn empty_routes_table_is_fatal() {
        let csv = "routes,fare structure,distance (km),buses available\n";
        let err = read_routes(csv.as_bytes(), "routes.csv").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn fuel_rows_are_upper_cased_and_empty_table_allowed() {
        let csv = "Fuel Type,Route,Depot\nelectric,R1,D1\nCng,R2,D2\n,R3,D3\n";
        let table = read_fuel(csv.as_bytes(), "fuel.csv").unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].fuel_type, "ELECTRIC");
        assert_eq!(table.records[1].fuel_type, "CNG");
        assert_eq!(table.row_errors.len(), 1);
        assert_eq!(table.records[0].route.as_deref(), Some("R1"));

        let blank_depot = read_fuel("fuel type,route,depot\ndiesel,R9,\n".as_bytes(), "fuel.csv").unwrap();
        assert_eq!(blank_depot.records[0].depot, None);
        assert!(blank_depot.row_errors.is_empty());

        let empty = read_fuel("fuel type,route,depot\n".as_bytes(), "fuel.csv").unwrap();
        assert!(empty.records.is_empty());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_routes(Path::new("does/not/exist.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("does/not/exist.csv"));
    }
}
