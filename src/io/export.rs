//! Export chart specs and query results as JSON.
//!
//! The JSON mirrors the in-memory types so any external renderer can
//! draw a chart without re-deriving its data.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::ChartSpec;
use crate::error::AppError;

/// Write a chart spec to a JSON file.
pub fn write_chart_json(path: &Path, spec: &ChartSpec) -> Result<(), AppError> {
    write_json(path, spec)
}

/// Pretty-print any serializable value as JSON text.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON '{}': {e}", path.display())))?;

    Ok(())
}
