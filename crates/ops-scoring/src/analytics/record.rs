use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A disruption or recovery-log row reduced to what aggregation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    #[serde(default)]
    pub numeric_fields: BTreeMap<String, f64>,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl KpiRecord {
    pub fn new(timestamp: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            timestamp,
            category: category.into(),
            numeric_fields: BTreeMap::new(),
            flags: BTreeMap::new(),
        }
    }

    pub fn with_number(mut self, field: impl Into<String>, value: f64) -> Self {
        self.numeric_fields.insert(field.into(), value);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>, value: bool) -> Self {
        self.flags.insert(flag.into(), value);
        self
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.numeric_fields.get(field).copied()
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}
