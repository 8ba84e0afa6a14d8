//! Derived statistics over the normalized tables.
//!
//! - extremal route records for the KPI cards (`routes`)
//! - per-fuel frequency aggregates and leaders (`fuel`)

pub mod fuel;
pub mod routes;

pub use fuel::*;
pub use routes::*;
