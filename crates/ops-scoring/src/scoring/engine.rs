use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ScoringError;
use super::weights::WeightSet;

/// Normalised per-criterion values in `[0, 1]` derived by the caller from a
/// candidate's real attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn check_range(&self) -> Result<(), ScoringError> {
        match self
            .0
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(*value))
        {
            Some((key, value)) => Err(ScoringError::OutOfRange {
                key: key.clone(),
                value: *value,
            }),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }
}

/// Contribution of one criterion to a score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub key: String,
    pub weight: f64,
    pub feature: f64,
    pub contribution: f64,
}

/// Weighted total plus the per-criterion breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: f64,
    pub breakdown: Vec<ScoreComponent>,
}

impl ScoreResult {
    /// Contribution of `key`, zero when it did not take part.
    pub fn contribution(&self, key: &str) -> f64 {
        self.breakdown
            .iter()
            .find(|component| component.key == key)
            .map(|component| component.contribution)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate<K> {
    pub id: K,
    pub score: ScoreResult,
}

/// Stateless evaluator applying a weight snapshot to feature vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Only keys present in both the weights and the features contribute;
    /// anything else counts as zero. Terms are summed in weight-set order.
    pub fn score(
        &self,
        weights: &WeightSet,
        features: &FeatureVector,
    ) -> Result<ScoreResult, ScoringError> {
        features.check_range()?;

        let mut total = 0.0;
        let mut breakdown = Vec::new();
        for (key, weight) in weights.scoring_terms() {
            let Some(feature) = features.get(key) else {
                continue;
            };
            let contribution = weight * feature;
            total += contribution;
            breakdown.push(ScoreComponent {
                key: key.to_string(),
                weight,
                feature,
                contribution,
            });
        }

        Ok(ScoreResult { total, breakdown })
    }

    /// Score every candidate and order them by total, highest first. Ties keep
    /// the order in which candidates were supplied.
    pub fn rank<K, I>(
        &self,
        weights: &WeightSet,
        candidates: I,
    ) -> Result<Vec<RankedCandidate<K>>, ScoringError>
    where
        I: IntoIterator<Item = (K, FeatureVector)>,
    {
        let mut ranked = candidates
            .into_iter()
            .map(|(id, features)| {
                self.score(weights, &features)
                    .map(|score| RankedCandidate { id, score })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(|a, b| {
            b.score
                .total
                .partial_cmp(&a.score.total)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            category = weights.category(),
            candidates = ranked.len(),
            "ranked candidates"
        );
        Ok(ranked)
    }
}
