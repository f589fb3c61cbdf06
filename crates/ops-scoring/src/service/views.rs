use serde::{Deserialize, Serialize};

use crate::scoring::{Criterion, CustomParameter, FeatureVector, RankedCandidate, WeightHealth, WeightSet};

/// Display snapshot of one category's weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSetView {
    pub category: String,
    pub target: f64,
    pub total_weight: f64,
    pub deviation: f64,
    pub health: WeightHealth,
    pub health_label: &'static str,
    pub warnings: Vec<String>,
    pub weights: Vec<WeightView>,
    pub custom_parameters: Vec<CustomParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightView {
    pub key: String,
    pub label: String,
    pub weight: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    pub step: f64,
    pub available: f64,
}

impl WeightSetView {
    pub fn from_weights(weights: &WeightSet, target: f64) -> Self {
        let health = weights.health(target);
        Self {
            category: weights.category().to_string(),
            target,
            total_weight: weights.total_weight(),
            deviation: weights.deviation_from_target(target),
            health,
            health_label: health.label(),
            warnings: weights.validate(target),
            weights: weights
                .entries()
                .iter()
                .map(|entry| WeightView::new(&entry.criterion, entry.weight, weights, target))
                .collect(),
            custom_parameters: weights.custom_parameters().to_vec(),
        }
    }
}

impl WeightView {
    fn new(criterion: &Criterion, weight: f64, weights: &WeightSet, target: f64) -> Self {
        Self {
            key: criterion.key.clone(),
            label: criterion.label.clone(),
            weight,
            min_weight: criterion.min_weight,
            max_weight: criterion.max_weight,
            step: criterion.step,
            available: weights
                .available_weight(&criterion.key, target)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetWeightRequest {
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInput {
    pub id: String,
    #[serde(default)]
    pub features: FeatureVector,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub candidates: Vec<CandidateInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub category: String,
    pub ranked: Vec<RankedCandidate<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub category: String,
    pub criteria: usize,
    pub total_weight: f64,
    pub health_label: &'static str,
}
