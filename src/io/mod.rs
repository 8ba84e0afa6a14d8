//! Input/output helpers.
//!
//! - CSV ingest + normalization (`ingest`)
//! - chart/query exports as JSON (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
