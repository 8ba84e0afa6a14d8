//! Markdown summary writer (KPIs, leaders, aggregates, skipped rows).

use std::fmt::Write as _;
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::app::context::DashboardContext;
use crate::domain::{FuelKind, Kpi, RowError};
use crate::error::AppError;

/// Write the summary to `out`, or to `reports/depot_report_<timestamp>.md`.
pub fn write_markdown_report(ctx: &DashboardContext, out: Option<&Path>) -> Result<PathBuf, AppError> {
    let now = Local::now();
    let path = match out {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = PathBuf::from("reports");
            create_dir_all(&dir)
                .map_err(|e| AppError::new(2, format!("Failed to create report dir: {e}")))?;
            dir.join(format!("depot_report_{}.md", now.format("%Y%m%d_%H%M%S")))
        }
    };

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(2, format!("Failed to create report '{}': {e}", path.display())))?;
    file.write_all(render_markdown_report(ctx, now).as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write report '{}': {e}", path.display())))?;

    Ok(path)
}

/// Render the summary as Markdown text.
pub fn render_markdown_report(ctx: &DashboardContext, generated: DateTime<Local>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Depot dashboard report");
    let _ = writeln!(out, "- generated: {}", generated.to_rfc3339());
    let _ = writeln!(
        out,
        "- routes: {} ({} rows used of {})",
        ctx.config.routes_path.display(),
        ctx.routes.records.len(),
        ctx.routes.rows_read
    );
    let _ = writeln!(
        out,
        "- fuel: {} ({} rows used of {})",
        ctx.config.fuel_path.display(),
        ctx.fuel.records.len(),
        ctx.fuel.rows_read
    );

    push_kpi_table(&mut out, "Route KPIs", &ctx.kpis());
    push_kpi_table(&mut out, "Fuel leaders", &ctx.fuel_leaders());

    let _ = writeln!(out, "\n## Buses per route by fuel type");
    for kind in FuelKind::ALL {
        let counts = ctx.fuel_summary.by_route(kind);
        let _ = writeln!(out, "\n### {} ({} buses)", kind.display_name(), counts.total());
        if counts.is_empty() {
            let _ = writeln!(out, "_no data_");
            continue;
        }
        let _ = writeln!(out, "| route | count |\n|---|---|");
        for (route, n) in &counts.entries {
            let _ = writeln!(out, "| {route} | {n} |");
        }
    }

    let _ = writeln!(out, "\n## Buses per depot");
    if ctx.fuel_summary.depots.rows.is_empty() {
        let _ = writeln!(out, "_no data_");
    } else {
        let _ = writeln!(out, "| fuel type | depot | count |\n|---|---|---|");
        for row in &ctx.fuel_summary.depots.rows {
            let _ = writeln!(out, "| {} | {} | {} |", row.fuel_type, row.depot, row.count);
        }
    }

    push_row_errors(&mut out, "routes", &ctx.routes.row_errors);
    push_row_errors(&mut out, "fuel", &ctx.fuel.row_errors);

    out
}

fn push_kpi_table(out: &mut String, heading: &str, kpis: &[Kpi]) {
    let _ = writeln!(out, "\n## {heading}\n| metric | value |\n|---|---|");
    for kpi in kpis {
        let _ = writeln!(out, "| {} | {} |", kpi.label, kpi.value);
    }
}

fn push_row_errors(out: &mut String, what: &str, errors: &[RowError]) {
    if errors.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## Skipped {what} rows");
    for e in errors {
        let _ = writeln!(out, "- line {}: {}", e.line, e.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::context::tests::sample_context;

    #[test]
    fn report_lists_kpis_and_aggregates() {
        let ctx = sample_context();
        let md = render_markdown_report(&ctx, Local::now());
        assert!(md.starts_with("# Depot dashboard report\n"));
        assert!(md.contains("| Most Expensive Fare | Route 1 - $100 |"));
        assert!(md.contains("| Route w/ Most Diesel Buses | N/A (0) |"));
        assert!(md.contains("### EV (2 buses)"));
        assert!(md.contains("| ELECTRIC | Rockfort | 2 |"));
        assert!(!md.contains("Skipped"));
    }
}
