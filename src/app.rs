//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves input paths
//! - initializes logging
//! - builds the dashboard context once
//! - dispatches to the KPI/chart/query/report printers or the TUI

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{ChartArgs, Command, QueryArgs, ReportArgs, SourceArgs};
use crate::domain::{DEFAULT_FUEL_CSV, DEFAULT_ROUTES_CSV, DashConfig, FUEL_ENV, ROUTES_ENV};
use crate::error::AppError;

pub mod context;

/// Entry point for the `depot` binary.
pub fn run() -> Result<(), AppError> {
    // `depot` and `depot --routes x.csv` behave like `depot tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.command.source().verbose);

    match cli.command {
        Command::Kpis(source) => handle_kpis(&source),
        Command::Chart(args) => handle_chart(args),
        Command::Query(args) => handle_query(args),
        Command::Report(args) => handle_report(args),
        Command::Tui(source) => crate::tui::run(context::build_context(&config_from_args(&source))?),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn handle_kpis(source: &SourceArgs) -> Result<(), AppError> {
    let ctx = context::build_context(&config_from_args(source))?;
    println!("{}", crate::report::format_kpis("Depot routes:", &ctx.kpis()));
    println!("{}", crate::report::format_kpis("Fuel types:", &ctx.fuel_leaders()));
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let ctx = context::build_context(&config_from_args(&args.source))?;

    let Some(spec) = ctx.chart(args.kind) else {
        println!("No data for {}.", args.kind.display_name());
        return Ok(());
    };

    if !args.no_plot {
        println!("{}", crate::plot::render_chart(&spec, args.width, args.height));
    }

    if let Some(path) = &args.json {
        crate::io::export::write_chart_json(path, &spec)?;
        info!("Wrote chart spec: {}", path.display());
    }

    Ok(())
}

fn handle_query(args: QueryArgs) -> Result<(), AppError> {
    let ctx = context::build_context(&config_from_args(&args.source))?;
    let outcome = ctx.query(&args.text);

    if args.json {
        println!("{}", crate::io::export::to_json_string(&outcome)?);
    } else {
        println!("{}", crate::report::format_query_outcome(&outcome));
    }
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let ctx = context::build_context(&config_from_args(&args.source))?;
    let path = crate::report::write_markdown_report(&ctx, args.out.as_deref())?;
    println!("Wrote report: {}", path.display());
    Ok(())
}

/// Resolve input paths: CLI flag, then environment (`.env` honored), then default.
pub fn config_from_args(args: &SourceArgs) -> DashConfig {
    dotenvy::dotenv().ok();
    DashConfig {
        routes_path: resolve_path(args.routes.as_ref(), ROUTES_ENV, DEFAULT_ROUTES_CSV),
        fuel_path: resolve_path(args.fuel.as_ref(), FUEL_ENV, DEFAULT_FUEL_CSV),
    }
}

fn resolve_path(flag: Option<&PathBuf>, env_key: &str, default: &str) -> PathBuf {
    if let Some(path) = flag {
        return path.clone();
    }
    match std::env::var(env_key) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from(default),
    }
}

/// Rewrite argv so `depot` defaults to `depot tui`.
///
/// Rules:
/// - `depot`                         -> `depot tui`
/// - `depot --routes r.csv ...`      -> `depot tui --routes r.csv ...`
/// - `depot --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }

    argv
}
