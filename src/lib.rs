//! `depot-dash` library crate.
//!
//! The binary (`depot`) is a thin wrapper around this library so that:
//!
//! - loading, metrics, and chart building are testable without spawning processes
//! - the CLI printers and the TUI share one `DashboardContext`

pub mod analytics;
pub mod app;
pub mod charts;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod query;
pub mod report;
pub mod tui;
