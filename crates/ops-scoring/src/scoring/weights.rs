use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criterion::Criterion;
use super::error::ScoringError;
use super::registry::CriterionRegistry;

/// Totals within this distance of the target count as balanced.
const BALANCE_TOLERANCE: f64 = 1e-9;

/// Custom parameters sit on the same 0–100 slider as built-in criteria.
const CUSTOM_MIN_WEIGHT: f64 = 0.0;
const CUSTOM_MAX_WEIGHT: f64 = 100.0;

/// Identifier assigned to a custom parameter, e.g. `custom_3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterId(pub String);

impl ParameterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A criterion together with its current weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntry {
    pub criterion: Criterion,
    pub weight: f64,
}

/// Operator-defined weight appended to a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomParameter {
    pub id: ParameterId,
    pub name: String,
    pub weight: f64,
    pub description: String,
}

/// Advisory classification of a set's total against its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WeightHealth {
    Balanced,
    Under { missing: f64 },
    Over { excess: f64 },
}

impl WeightHealth {
    pub fn label(&self) -> &'static str {
        match self {
            WeightHealth::Balanced => "Balanced",
            WeightHealth::Under { .. } => "Below target",
            WeightHealth::Over { .. } => "Exceeds target",
        }
    }
}

/// Immutable snapshot of the weights for one category.
///
/// Every mutator returns a fresh set, so a reader holding an older snapshot
/// never observes a partial update. Totals are never rescaled.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    category: String,
    entries: Vec<WeightEntry>,
    custom_parameters: Vec<CustomParameter>,
    next_custom_id: u64,
}

impl WeightSet {
    /// Startup snapshot: every registered criterion at its default weight.
    pub fn from_registry(registry: &CriterionRegistry, category: &str) -> Self {
        let entries = registry
            .criteria(category)
            .iter()
            .map(|criterion| WeightEntry {
                weight: criterion.default_weight,
                criterion: criterion.clone(),
            })
            .collect();

        Self {
            category: category.to_string(),
            entries,
            custom_parameters: Vec::new(),
            next_custom_id: 1,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn custom_parameters(&self) -> &[CustomParameter] {
        &self.custom_parameters
    }

    /// Base criterion weights in registration order.
    pub fn weights(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.criterion.key.as_str(), entry.weight))
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.entry(key).map(|entry| entry.weight)
    }

    pub fn custom_parameter(&self, id: &ParameterId) -> Option<&CustomParameter> {
        self.custom_parameters
            .iter()
            .find(|parameter| &parameter.id == id)
    }

    pub fn set_weight(&self, key: &str, value: f64) -> Result<WeightSet, ScoringError> {
        let index = self.entry_index(key)?;
        if !value.is_finite() {
            return Err(ScoringError::InvalidWeight {
                key: key.to_string(),
            });
        }

        let mut next = self.clone();
        let entry = &mut next.entries[index];
        entry.weight = entry.criterion.clamp(value);
        debug!(
            category = %self.category,
            key,
            requested = value,
            applied = entry.weight,
            "weight updated"
        );
        Ok(next)
    }

    /// Remove a base criterion from the snapshot, typically after it was
    /// removed from the registry.
    pub fn drop_criterion(&self, key: &str) -> Result<WeightSet, ScoringError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.criterion.key == key)
            .ok_or_else(|| self.not_found(key))?;

        let mut next = self.clone();
        next.entries.remove(index);
        Ok(next)
    }

    /// Sum of base weights followed by custom parameter weights.
    pub fn total_weight(&self) -> f64 {
        self.base_weight() + self.custom_weight()
    }

    pub fn deviation_from_target(&self, target: f64) -> f64 {
        self.total_weight() - target
    }

    pub fn health(&self, target: f64) -> WeightHealth {
        let deviation = self.deviation_from_target(target);
        if deviation.abs() <= BALANCE_TOLERANCE {
            WeightHealth::Balanced
        } else if deviation < 0.0 {
            WeightHealth::Under {
                missing: -deviation,
            }
        } else {
            WeightHealth::Over { excess: deviation }
        }
    }

    /// Warnings an operator should see before saving.
    pub fn validate(&self, target: f64) -> Vec<String> {
        let mut warnings = Vec::new();
        let total = self.total_weight();

        if total > target + BALANCE_TOLERANCE {
            warnings.push(format!(
                "{}: total weight ({total}%) exceeds {target}%",
                self.category
            ));

            if !self.custom_parameters.is_empty() {
                warnings.push(format!(
                    "{}: custom parameters weight ({}%) plus base parameters weight ({}%) exceeds {target}%",
                    self.category,
                    self.custom_weight(),
                    self.base_weight()
                ));
            }
        }

        warnings
    }

    /// Headroom left for `key` before the total reaches `target`. `key` may
    /// name a base criterion or a custom parameter id.
    pub fn available_weight(&self, key: &str, target: f64) -> Result<f64, ScoringError> {
        let current = self
            .weight(key)
            .or_else(|| {
                self.custom_parameters
                    .iter()
                    .find(|parameter| parameter.id.as_str() == key)
                    .map(|parameter| parameter.weight)
            })
            .ok_or_else(|| ScoringError::UnknownCriterion {
                category: self.category.clone(),
                key: key.to_string(),
            })?;

        Ok((target - self.total_weight() + current).max(0.0))
    }

    /// Like [`WeightSet::set_weight`], but refuses updates that would push the
    /// total above `target`.
    pub fn set_weight_within_target(
        &self,
        key: &str,
        value: f64,
        target: f64,
    ) -> Result<WeightSet, ScoringError> {
        self.set_weight(key, value)?.within_target(target)
    }

    /// Like [`WeightSet::set_custom_weight`], but refuses updates that would
    /// push the total above `target`.
    pub fn set_custom_weight_within_target(
        &self,
        id: &ParameterId,
        value: f64,
        target: f64,
    ) -> Result<WeightSet, ScoringError> {
        self.set_custom_weight(id, value)?.within_target(target)
    }

    fn within_target(self, target: f64) -> Result<WeightSet, ScoringError> {
        let total = self.total_weight();
        if total > target + BALANCE_TOLERANCE {
            return Err(ScoringError::ExceedsTarget { total, target });
        }
        Ok(self)
    }

    /// Raise `key` by taking weight from the other base criteria in
    /// proportion to how far each sits above its minimum, so criteria already
    /// at their floor give nothing. Decreases are applied directly.
    pub fn rebalance(&self, key: &str, value: f64) -> Result<WeightSet, ScoringError> {
        let index = self.entry_index(key)?;
        if !value.is_finite() {
            return Err(ScoringError::InvalidWeight {
                key: key.to_string(),
            });
        }

        let current = self.entries[index].weight;
        let requested = self.entries[index].criterion.clamp(value);
        let difference = requested - current;
        if difference <= 0.0 {
            return self.set_weight(key, requested);
        }

        let reducible_total: f64 = self
            .entries
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, entry)| reducible(entry))
            .sum();

        let increase = difference.min(reducible_total);
        if increase <= 0.0 {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        next.entries[index].weight = current + increase;
        for (position, entry) in next.entries.iter_mut().enumerate() {
            if position == index {
                continue;
            }
            let reduction = increase * (reducible(entry) / reducible_total);
            let reduced = ((entry.weight - reduction) * 10.0).round() / 10.0;
            entry.weight = entry.criterion.clamp(reduced);
        }

        debug!(category = %self.category, key, increase, "weights rebalanced");
        Ok(next)
    }

    pub fn add_custom_parameter(
        &self,
        name: &str,
        weight: f64,
        description: &str,
    ) -> Result<(WeightSet, ParameterId), ScoringError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScoringError::EmptyName);
        }
        if !weight.is_finite() {
            return Err(ScoringError::InvalidWeight {
                key: name.to_string(),
            });
        }

        let id = ParameterId(format!("custom_{}", self.next_custom_id));
        let mut next = self.clone();
        next.next_custom_id += 1;
        next.custom_parameters.push(CustomParameter {
            id: id.clone(),
            name: name.to_string(),
            weight: clamp_custom(weight),
            description: description.trim().to_string(),
        });

        debug!(category = %self.category, %id, name, "custom parameter added");
        Ok((next, id))
    }

    pub fn set_custom_weight(&self, id: &ParameterId, value: f64) -> Result<WeightSet, ScoringError> {
        let index = self.custom_index(id)?;
        if !value.is_finite() {
            return Err(ScoringError::InvalidWeight {
                key: id.to_string(),
            });
        }

        let mut next = self.clone();
        next.custom_parameters[index].weight = clamp_custom(value);
        Ok(next)
    }

    pub fn remove_custom_parameter(&self, id: &ParameterId) -> Result<WeightSet, ScoringError> {
        let index = self.custom_index(id)?;
        let mut next = self.clone();
        next.custom_parameters.remove(index);
        debug!(category = %self.category, %id, "custom parameter removed");
        Ok(next)
    }

    /// Every weighted key in summation order: base criteria, then custom
    /// parameters keyed by id.
    pub(crate) fn scoring_terms(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights().chain(
            self.custom_parameters
                .iter()
                .map(|parameter| (parameter.id.as_str(), parameter.weight)),
        )
    }

    fn base_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    fn custom_weight(&self) -> f64 {
        self.custom_parameters
            .iter()
            .map(|parameter| parameter.weight)
            .sum()
    }

    fn entry(&self, key: &str) -> Option<&WeightEntry> {
        self.entries.iter().find(|entry| entry.criterion.key == key)
    }

    fn entry_index(&self, key: &str) -> Result<usize, ScoringError> {
        self.entries
            .iter()
            .position(|entry| entry.criterion.key == key)
            .ok_or_else(|| ScoringError::UnknownCriterion {
                category: self.category.clone(),
                key: key.to_string(),
            })
    }

    fn custom_index(&self, id: &ParameterId) -> Result<usize, ScoringError> {
        self.custom_parameters
            .iter()
            .position(|parameter| &parameter.id == id)
            .ok_or_else(|| self.not_found(id.as_str()))
    }

    fn not_found(&self, key: &str) -> ScoringError {
        ScoringError::NotFound {
            category: self.category.clone(),
            key: key.to_string(),
        }
    }
}

/// Weight an entry can give up before reaching its minimum.
fn reducible(entry: &WeightEntry) -> f64 {
    (entry.weight - entry.criterion.min_weight).max(0.0)
}

fn clamp_custom(weight: f64) -> f64 {
    weight.max(CUSTOM_MIN_WEIGHT).min(CUSTOM_MAX_WEIGHT)
}
