//! Grouped counts and ratios by `(department, decade)`.
//!
//! One pass over the classified records fills a map of running counts; the
//! map is then materialized into `AggregateRow`s. Because only keys that were
//! actually seen are materialized, every row has `total_count >= 1` and its
//! ratios are well-defined.
//!
//! Rows come out sorted by `(department, decade)` (the map is a `BTreeMap`),
//! which keeps reports stable. Consumers should still not rely on order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{AcquisitionType, AggregateRow, ClassifiedRecord};

#[derive(Debug, Clone, Copy, Default)]
struct GroupCounts {
    gift: usize,
    purchase: usize,
    total: usize,
}

/// Aggregate classified records into one row per realized group.
pub fn aggregate(records: &[ClassifiedRecord]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(String, i64), GroupCounts> = BTreeMap::new();

    for r in records {
        let counts = groups
            .entry((r.record.department.clone(), r.decade))
            .or_default();
        counts.total += 1;
        match r.acquisition_type {
            AcquisitionType::Philanthropy => counts.gift += 1,
            AcquisitionType::Purchase => counts.purchase += 1,
            AcquisitionType::Other => {}
        }
    }

    let rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|((department, decade), c)| AggregateRow {
            department,
            decade,
            gift_count: c.gift,
            purchase_count: c.purchase,
            total_count: c.total,
            gift_ratio: c.gift as f64 / c.total as f64,
            purchase_ratio: c.purchase as f64 / c.total as f64,
        })
        .collect();

    debug!(groups = rows.len(), records = records.len(), "aggregated records");
    rows
}

/// Distinct departments present in the aggregate table, sorted.
pub fn departments(rows: &[AggregateRow]) -> Vec<String> {
    let mut out: Vec<String> = rows.iter().map(|r| r.department.clone()).collect();
    out.sort();
    out.dedup();
    out
}

/// Distinct decades present in the aggregate table, ascending.
pub fn decades(rows: &[AggregateRow]) -> Vec<i64> {
    let mut out: Vec<i64> = rows.iter().map(|r| r.decade).collect();
    out.sort_unstable();
    out.dedup();
    out
}
