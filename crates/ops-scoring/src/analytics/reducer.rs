use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::record::{KpiRecord, TimeWindow};
use super::summary::KpiSummary;

#[derive(Default)]
struct FlagTally {
    set: usize,
    defined: usize,
}

/// Folds records into a [`KpiSummary`]. Holds no state between calls, so the
/// same input always yields an identical summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationReducer;

impl AggregationReducer {
    pub fn new() -> Self {
        Self
    }

    /// Summarise the records whose timestamp falls in `[window_start, window_end)`.
    /// Empty inputs and empty windows produce zeros, never an error.
    pub fn aggregate(
        &self,
        records: &[KpiRecord],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> KpiSummary {
        self.aggregate_window(records, TimeWindow::new(window_start, window_end))
    }

    pub fn aggregate_window(&self, records: &[KpiRecord], window: TimeWindow) -> KpiSummary {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut flags: BTreeMap<String, FlagTally> = BTreeMap::new();
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut included = 0usize;

        for record in records.iter().filter(|record| window.contains(record.timestamp)) {
            included += 1;
            *counts.entry(record.category.clone()).or_default() += 1;

            for (flag, value) in &record.flags {
                let tally = flags.entry(flag.clone()).or_default();
                tally.defined += 1;
                if *value {
                    tally.set += 1;
                }
            }

            for (field, value) in &record.numeric_fields {
                *totals.entry(field.clone()).or_default() += *value;
            }
        }

        let rates = flags
            .into_iter()
            .map(|(flag, tally)| (flag, ratio(tally.set as f64, tally.defined)))
            .collect();

        // Records missing a field count as zero towards its mean.
        let averages = totals
            .iter()
            .map(|(field, total)| (field.clone(), ratio(*total, included)))
            .collect();

        debug!(
            records = records.len(),
            included,
            categories = counts.len(),
            "aggregated kpi records"
        );

        KpiSummary {
            counts,
            rates,
            totals,
            averages,
        }
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator / denominator as f64
    } else {
        0.0
    }
}
