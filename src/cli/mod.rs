//! Command-line parsing for the depot dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! loading, aggregation and rendering.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ChartKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "depot", version, about = "Transit depot routes & fuel-type dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the route KPIs and fuel leaders.
    Kpis(SourceArgs),
    /// Generate one chart, print it, and optionally export its spec as JSON.
    Chart(ChartArgs),
    /// Look up the first route whose name contains the given text.
    Query(QueryArgs),
    /// Write a Markdown summary of KPIs and aggregates.
    Report(ReportArgs),
    /// Launch the interactive TUI.
    Tui(SourceArgs),
}

/// Input datasets and logging, shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Routes CSV (falls back to $DEPOT_ROUTES_CSV, then `depot_routes.csv`).
    #[arg(long, value_name = "CSV")]
    pub routes: Option<PathBuf>,

    /// Fuel-types CSV (falls back to $DEPOT_FUEL_CSV, then `fuel_types.csv`).
    #[arg(long, value_name = "CSV")]
    pub fuel: Option<PathBuf>,

    /// Log at info level (RUST_LOG overrides).
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Which chart to generate.
    #[arg(value_enum)]
    pub kind: ChartKind,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Export the chart spec to JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Skip the terminal rendering.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows, line/scatter/stem only).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Text to search for in route names (case-insensitive).
    pub text: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output path (defaults to `reports/depot_report_<timestamp>.md`).
    #[arg(long, value_name = "MD")]
    pub out: Option<PathBuf>,
}

impl Command {
    pub fn source(&self) -> &SourceArgs {
        match self {
            Command::Kpis(source) | Command::Tui(source) => source,
            Command::Chart(args) => &args.source,
            Command::Query(args) => &args.source,
            Command::Report(args) => &args.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_parses_kebab_case() {
        let cli = Cli::parse_from(["depot", "chart", "sorted-distance-line", "--routes", "r.csv"]);
        let Command::Chart(args) = cli.command else {
            panic!("expected chart command");
        };
        assert_eq!(args.kind, ChartKind::SortedDistanceLine);
        assert_eq!(args.source.routes, Some(PathBuf::from("r.csv")));
        assert_eq!(args.width, 80);
    }

    #[test]
    fn query_takes_free_text() {
        let cli = Cli::parse_from(["depot", "query", "route 1", "--json"]);
        let Command::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.text, "route 1");
        assert!(args.json);
    }
}
