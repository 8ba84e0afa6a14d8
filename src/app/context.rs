//! The immutable dashboard context shared by every front-end.
//!
//! Tables are loaded and normalized once, metrics and aggregates are derived
//! once, and everything afterwards is a read:
//! CSV load -> normalize -> route metrics + fuel summary -> charts / queries

use tracing::debug;

use crate::analytics::{FuelSummary, RouteMetrics, compute_route_metrics};
use crate::charts::build_chart;
use crate::domain::{ChartKind, ChartSpec, DashConfig, FuelTable, Kpi, RoutesTable};
use crate::error::AppError;
use crate::io::ingest::{load_fuel, load_routes};
use crate::query::{QueryOutcome, resolve_route};
use crate::report::{fuel_leader_kpis, route_kpis};

/// All computed state for one session. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub config: DashConfig,
    pub routes: RoutesTable,
    pub fuel: FuelTable,
    pub route_metrics: RouteMetrics,
    pub fuel_summary: FuelSummary,
}

/// Load both datasets and derive the context.
pub fn build_context(config: &DashConfig) -> Result<DashboardContext, AppError> {
    let routes = load_routes(&config.routes_path)?;
    let fuel = load_fuel(&config.fuel_path)?;
    DashboardContext::from_tables(config.clone(), routes, fuel)
}

impl DashboardContext {
    /// Derive the context from already-loaded tables.
    pub fn from_tables(config: DashConfig, routes: RoutesTable, fuel: FuelTable) -> Result<Self, AppError> {
        let route_metrics = compute_route_metrics(&routes)?;
        let fuel_summary = FuelSummary::from_table(&fuel);

        let ctx = Self {
            config,
            routes,
            fuel,
            route_metrics,
            fuel_summary,
        };

        for kpi in ctx.kpis().iter().chain(ctx.fuel_leaders().iter()) {
            debug!(label = %kpi.label, value = %kpi.value, "kpi");
        }

        Ok(ctx)
    }

    /// Route KPI cards (most expensive, shortest/longest, most/least buses).
    pub fn kpis(&self) -> Vec<Kpi> {
        route_kpis(&self.route_metrics)
    }

    /// Fuel leader cards (EV, CNG, Diesel).
    pub fn fuel_leaders(&self) -> Vec<Kpi> {
        fuel_leader_kpis(&self.fuel_summary)
    }

    /// Generate a chart on demand; `None` when its source data is empty.
    pub fn chart(&self, kind: ChartKind) -> Option<ChartSpec> {
        build_chart(kind, &self.routes, &self.fuel_summary)
    }

    pub fn query(&self, text: &str) -> QueryOutcome {
        resolve_route(&self.routes, text)
    }
}
