use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// A named, bounded, steppable weight slot within a scoring category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub key: String,
    pub label: String,
    pub min_weight: f64,
    pub max_weight: f64,
    pub step: f64,
    pub default_weight: f64,
}

impl Criterion {
    pub const DEFAULT_MIN: f64 = 0.0;
    pub const DEFAULT_MAX: f64 = 100.0;
    pub const DEFAULT_STEP: f64 = 5.0;

    /// Percentage slot on the usual 0–100 slider in steps of five.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            min_weight: Self::DEFAULT_MIN,
            max_weight: Self::DEFAULT_MAX,
            step: Self::DEFAULT_STEP,
            default_weight: Self::DEFAULT_MIN,
        }
    }

    /// Same as [`Criterion::new`] with the label derived from a camelCase key.
    pub fn keyed(key: impl Into<String>) -> Self {
        let key = key.into();
        let label = label_from_key(&key);
        Self::new(key, label)
    }

    pub fn with_bounds(mut self, min_weight: f64, max_weight: f64) -> Self {
        self.min_weight = min_weight;
        self.max_weight = max_weight;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_default(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    /// Pin `value` into `[min_weight, max_weight]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min_weight).min(self.max_weight)
    }

    pub(crate) fn validate(&self) -> Result<(), ScoringError> {
        if self.key.trim().is_empty() {
            return Err(ScoringError::EmptyName);
        }

        let finite = self.min_weight.is_finite()
            && self.max_weight.is_finite()
            && self.step.is_finite()
            && self.default_weight.is_finite();
        let ordered = self.min_weight <= self.max_weight;
        let default_within =
            self.default_weight >= self.min_weight && self.default_weight <= self.max_weight;

        if finite && ordered && self.step > 0.0 && default_within {
            Ok(())
        } else {
            Err(ScoringError::InvalidBounds {
                key: self.key.clone(),
                min: self.min_weight,
                max: self.max_weight,
                step: self.step,
                default: self.default_weight,
            })
        }
    }
}

/// `passengerImpactWeight` -> `Passenger Impact Weight`.
fn label_from_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if index == 0 {
            label.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            label.push(' ');
            label.push(ch);
        } else if ch == '_' {
            label.push(' ');
        } else {
            label.push(ch);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_label_from_camel_case_key() {
        let criterion = Criterion::keyed("passengerImpactWeight");
        assert_eq!(criterion.label, "Passenger Impact Weight");
    }

    #[test]
    fn clamps_into_bounds() {
        let criterion = Criterion::keyed("baseScore").with_bounds(50.0, 100.0);
        assert_eq!(criterion.clamp(10.0), 50.0);
        assert_eq!(criterion.clamp(120.0), 100.0);
        assert_eq!(criterion.clamp(72.5), 72.5);
    }

    #[test]
    fn default_outside_bounds_is_invalid() {
        let criterion = Criterion::keyed("baseScore")
            .with_bounds(50.0, 100.0)
            .with_default(20.0);
        assert!(matches!(
            criterion.validate(),
            Err(ScoringError::InvalidBounds { ref key, .. }) if key == "baseScore"
        ));
    }
}
