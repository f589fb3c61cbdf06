use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::record::{KpiRecord, TimeWindow};

/// Coarse severity bucket shown next to stations, routes and the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    /// Station severity by affected volume (e.g. passengers).
    pub fn from_affected(total: f64) -> Self {
        if total > 500.0 {
            Self::High
        } else if total > 200.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Route impact by how often it was disrupted.
    pub fn from_occurrences(count: usize) -> Self {
        match count {
            0..=1 => Self::Low,
            2..=3 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Network impact by the number of active disruptions.
    pub fn from_active_count(active: usize) -> Self {
        match active {
            0..=3 => Self::Low,
            4..=10 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "Low",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImpact {
    pub category: String,
    pub records: usize,
    pub field_total: f64,
    pub impact: ImpactLevel,
}

/// Categories with the largest sum of `field` inside the window, at most
/// `limit` of them. Equal sums keep first-seen order.
pub fn top_categories(
    records: &[KpiRecord],
    window: TimeWindow,
    field: &str,
    limit: usize,
) -> Vec<CategoryImpact> {
    let mut grouped = group_by_category(records, window, Some(field));
    grouped.sort_by(|a, b| {
        b.field_total
            .partial_cmp(&a.field_total)
            .unwrap_or(Ordering::Equal)
    });
    grouped.truncate(limit);

    for entry in &mut grouped {
        entry.impact = ImpactLevel::from_affected(entry.field_total);
    }
    grouped
}

/// The category with the most records in the window, e.g. the most
/// disrupted route.
pub fn most_frequent_category(records: &[KpiRecord], window: TimeWindow) -> Option<CategoryImpact> {
    let grouped = group_by_category(records, window, None);
    let mut best: Option<CategoryImpact> = None;
    for entry in grouped {
        if best
            .as_ref()
            .map_or(true, |current| entry.records > current.records)
        {
            best = Some(entry);
        }
    }

    best.map(|mut entry| {
        entry.impact = ImpactLevel::from_occurrences(entry.records);
        entry
    })
}

fn group_by_category(
    records: &[KpiRecord],
    window: TimeWindow,
    field: Option<&str>,
) -> Vec<CategoryImpact> {
    let mut grouped: Vec<CategoryImpact> = Vec::new();

    for record in records.iter().filter(|record| window.contains(record.timestamp)) {
        let value = field.and_then(|field| record.number(field)).unwrap_or(0.0);
        match grouped
            .iter_mut()
            .find(|entry| entry.category == record.category)
        {
            Some(entry) => {
                entry.records += 1;
                entry.field_total += value;
            }
            None => grouped.push(CategoryImpact {
                category: record.category.clone(),
                records: 1,
                field_total: value,
                impact: ImpactLevel::Low,
            }),
        }
    }

    grouped
}
