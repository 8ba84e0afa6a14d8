//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - normalized table rows (`RouteRecord`, `FuelRecord`) and their tables
//! - aggregate outputs (`FrequencyAggregate`, `CategoryLeader`)
//! - renderer-independent chart descriptions (`ChartSpec`, `ChartKind`)

pub mod types;

pub use types::*;
