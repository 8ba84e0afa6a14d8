//! Frequency aggregates over the fuel table.
//!
//! Most-frequent selection is deterministic: highest count first, ties broken
//! by the lexicographically smallest key.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CategoryLeader, FrequencyAggregate, FuelKind, FuelTable};
use crate::io::normalize_fuel_type;

/// Rows per `(fuel_type, depot)` pair, sorted by fuel type then depot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepotCounts {
    pub rows: Vec<DepotCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepotCount {
    pub fuel_type: String,
    pub depot: String,
    pub count: usize,
}

impl DepotCounts {
    /// Per-depot counts for one fuel type, in depot order.
    pub fn for_fuel(&self, fuel_type: &str) -> FrequencyAggregate {
        let target = normalize_fuel_type(fuel_type);
        FrequencyAggregate {
            entries: self
                .rows
                .iter()
                .filter(|r| r.fuel_type == target)
                .map(|r| (r.depot.clone(), r.count))
                .collect(),
        }
    }
}

/// Per-route aggregates for each reported fuel kind plus the depot breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FuelSummary {
    pub electric: FrequencyAggregate,
    pub cng: FrequencyAggregate,
    pub diesel: FrequencyAggregate,
    pub depots: DepotCounts,
}

impl FuelSummary {
    pub fn from_table(table: &FuelTable) -> Self {
        Self {
            electric: route_counts(table, FuelKind::Electric.label()),
            cng: route_counts(table, FuelKind::Cng.label()),
            diesel: route_counts(table, FuelKind::Diesel.label()),
            depots: depot_counts(table),
        }
    }

    pub fn by_route(&self, kind: FuelKind) -> &FrequencyAggregate {
        match kind {
            FuelKind::Electric => &self.electric,
            FuelKind::Cng => &self.cng,
            FuelKind::Diesel => &self.diesel,
        }
    }

    pub fn by_depot(&self, kind: FuelKind) -> FrequencyAggregate {
        self.depots.for_fuel(kind.label())
    }

    pub fn leader(&self, kind: FuelKind) -> CategoryLeader {
        leader(self.by_route(kind))
    }
}

/// Count rows per route among rows whose fuel type equals `fuel_type`.
///
/// The target is case-normalized the same way the table is. Rows with a blank
/// route are not counted. Entries are sorted by descending count, ties by
/// route name.
pub fn route_counts(table: &FuelTable, fuel_type: &str) -> FrequencyAggregate {
    let target = normalize_fuel_type(fuel_type);

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table.records.iter().filter(|r| r.fuel_type == target) {
        let Some(route) = record.route.as_deref() else { continue };
        *counts.entry(route).or_default() += 1;
    }

    let mut entries: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(route, n)| (route.to_string(), n))
        .collect();
    // Stable sort: BTreeMap order already breaks ties by key.
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    FrequencyAggregate { entries }
}

/// Count rows per `(fuel_type, depot)` across the whole table, skipping blank depots.
pub fn depot_counts(table: &FuelTable) -> DepotCounts {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in &table.records {
        let Some(depot) = record.depot.as_deref() else { continue };
        *counts.entry((record.fuel_type.as_str(), depot)).or_default() += 1;
    }

    DepotCounts {
        rows: counts
            .into_iter()
            .map(|((fuel_type, depot), count)| DepotCount {
                fuel_type: fuel_type.to_string(),
                depot: depot.to_string(),
                count,
            })
            .collect(),
    }
}

/// The most frequent key, or `NoData` for an empty aggregate.
pub fn leader(aggregate: &FrequencyAggregate) -> CategoryLeader {
    let mut best: Option<&(String, usize)> = None;
    for entry in &aggregate.entries {
        best = match best {
            Some(cur) if cur.1 > entry.1 || (cur.1 == entry.1 && cur.0 <= entry.0) => Some(cur),
            _ => Some(entry),
        };
    }

    match best {
        Some((key, count)) => CategoryLeader::Leader {
            key: key.clone(),
            count: *count,
        },
        None => CategoryLeader::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FuelRecord;

    fn fuel(rows: &[(&str, &str, &str)]) -> FuelTable {
        FuelTable {
            records: rows
                .iter()
                .map(|(route, fuel_type, depot)| FuelRecord {
                    route: Some(route.to_string()),
                    depot: Some(depot.to_string()),
                    fuel_type: fuel_type.to_string(),
                })
                .collect(),
            row_errors: Vec::new(),
            rows_read: rows.len(),
        }
    }

    #[test]
    fn leaders_scenario() {
        let t = fuel(&[
            ("R1", "ELECTRIC", "D1"),
            ("R1", "ELECTRIC", "D1"),
            ("R2", "CNG", "D2"),
        ]);
        let summary = FuelSummary::from_table(&t);
        assert_eq!(
            summary.leader(FuelKind::Electric),
            CategoryLeader::Leader { key: "R1".to_string(), count: 2 }
        );
        assert_eq!(
            summary.leader(FuelKind::Cng),
            CategoryLeader::Leader { key: "R2".to_string(), count: 1 }
        );
        assert_eq!(summary.leader(FuelKind::Diesel), CategoryLeader::NoData);
    }

    #[test]
    fn per_route_counts_sum_to_matching_rows() {
        let t = fuel(&[
            ("R1", "DIESEL", "D1"),
            ("R2", "DIESEL", "D1"),
            ("R2", "DIESEL", "D2"),
            ("R3", "CNG", "D2"),
            ("R1", "HYDROGEN", "D3"),
        ]);
        for label in ["DIESEL", "CNG", "HYDROGEN", "ELECTRIC"] {
            let rows = t.records.iter().filter(|r| r.fuel_type == label).count();
            assert_eq!(route_counts(&t, label).total(), rows, "{label}");
        }
    }

    #[test]
    fn blank_depot_or_route_only_drops_that_grouping() {
        let csv = "fuel type,route,depot\nelectric,R1,D1\nelectric,R1,\nelectric,R2,D2\nelectric,,D2\n";
        let t = crate::io::read_fuel(csv.as_bytes(), "fuel.csv").unwrap();
        assert_eq!(t.records.len(), 4);
        assert!(t.row_errors.is_empty());

        let by_route = route_counts(&t, "ELECTRIC");
        assert_eq!(by_route.total(), 3);
        assert_eq!(by_route.get("R1"), Some(2));

        let by_depot = depot_counts(&t).for_fuel("ELECTRIC");
        assert_eq!(by_depot.entries, vec![("D1".to_string(), 1), ("D2".to_string(), 2)]);
    }

    #[test]
    fn target_label_is_case_normalized() {
        let t = fuel(&[("R1", "CNG", "D1")]);
        assert_eq!(route_counts(&t, "cng").get("R1"), Some(1));
    }

    #[test]
    fn counts_sorted_descending_with_name_tie_break() {
        let t = fuel(&[
            ("B", "CNG", "D1"),
            ("A", "CNG", "D1"),
            ("C", "CNG", "D1"),
            ("C", "CNG", "D1"),
        ]);
        let agg = route_counts(&t, "CNG");
        let keys: Vec<&str> = agg.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["C", "A", "B"]);
    }

    #[test]
    fn leader_tie_picks_smallest_key_regardless_of_order() {
        let agg = FrequencyAggregate {
            entries: vec![("Zeta".to_string(), 3), ("Alpha".to_string(), 3), ("Mid".to_string(), 1)],
        };
        assert_eq!(
            leader(&agg),
            CategoryLeader::Leader { key: "Alpha".to_string(), count: 3 }
        );
        assert_eq!(leader(&FrequencyAggregate::default()), CategoryLeader::NoData);
    }

    #[test]
    fn depot_counts_group_by_fuel_and_depot() {
        let t = fuel(&[
            ("R1", "ELECTRIC", "D2"),
            ("R2", "ELECTRIC", "D1"),
            ("R3", "ELECTRIC", "D2"),
            ("R4", "DIESEL", "D1"),
        ]);
        let depots = depot_counts(&t);
        assert_eq!(depots.rows.len(), 3);

        let ev = depots.for_fuel("electric");
        assert_eq!(ev.entries, vec![("D1".to_string(), 1), ("D2".to_string(), 2)]);
        assert!(depots.for_fuel("CNG").is_empty());
    }
}
