//! Weighted multi-criteria scoring: criteria registry, weight snapshots and
//! the engine that ranks candidates against them.

pub mod catalog;
mod criterion;
mod engine;
mod error;
mod registry;
mod weights;

#[cfg(test)]
mod tests;

pub use criterion::Criterion;
pub use engine::{FeatureVector, RankedCandidate, ScoreComponent, ScoreResult, ScoringEngine};
pub use error::ScoringError;
pub use registry::CriterionRegistry;
pub use weights::{CustomParameter, ParameterId, WeightEntry, WeightHealth, WeightSet};
