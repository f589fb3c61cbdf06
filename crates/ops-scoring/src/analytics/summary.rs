use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Derived statistics over the records inside one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub counts: BTreeMap<String, usize>,
    pub rates: BTreeMap<String, f64>,
    pub totals: BTreeMap<String, f64>,
    pub averages: BTreeMap<String, f64>,
}

impl KpiSummary {
    pub fn record_count(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn rate(&self, flag: &str) -> f64 {
        self.rates.get(flag).copied().unwrap_or(0.0)
    }

    pub fn total(&self, field: &str) -> f64 {
        self.totals.get(field).copied().unwrap_or(0.0)
    }

    pub fn average(&self, field: &str) -> f64 {
        self.averages.get(field).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
