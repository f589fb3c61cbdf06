//! Host-facing composition of the registry, the settings store and the
//! scoring engine.

mod router;
mod views;

#[cfg(test)]
mod tests;

pub(crate) use router::status_for;
pub use router::scoring_router;
pub use views::{
    CandidateInput, CategoryEntry, RankRequest, RankResponse, SetWeightRequest, WeightSetView,
    WeightView,
};

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::scoring::{
    Criterion, CriterionRegistry, FeatureVector, RankedCandidate, ScoreResult, ScoringEngine,
    ScoringError, WeightSet,
};
use crate::settings::{self, SettingsError, SettingsStore};

/// Origin recorded on settings written through the service.
const SERVICE_ORIGIN: &str = "weighting-service";

/// Keeps the current weight snapshot per category. The lock only guards the
/// pointer swap; readers keep whichever `Arc` they already hold.
pub struct WeightingService<S> {
    registry: CriterionRegistry,
    store: Arc<S>,
    engine: ScoringEngine,
    config: ScoringConfig,
    snapshots: RwLock<BTreeMap<String, Arc<WeightSet>>>,
}

impl<S> WeightingService<S>
where
    S: SettingsStore + 'static,
{
    pub fn new(
        registry: CriterionRegistry,
        store: Arc<S>,
        config: ScoringConfig,
    ) -> Result<Self, WeightingServiceError> {
        let snapshots = load_snapshots(&registry, store.as_ref())?;
        Ok(Self {
            registry,
            store,
            engine: ScoringEngine::new(),
            config,
            snapshots: RwLock::new(snapshots),
        })
    }

    pub fn weight_target(&self) -> f64 {
        self.config.weight_target
    }

    pub fn registry(&self) -> &CriterionRegistry {
        &self.registry
    }

    pub fn categories(&self) -> Result<Vec<CategoryEntry>, WeightingServiceError> {
        let snapshots = self.read()?;
        Ok(self
            .registry
            .categories()
            .filter_map(|category| snapshots.get(category))
            .map(|weights| CategoryEntry {
                category: weights.category().to_string(),
                criteria: weights.entries().len(),
                total_weight: weights.total_weight(),
                health_label: weights.health(self.config.weight_target).label(),
            })
            .collect())
    }

    pub fn criteria(&self, category: &str) -> Result<&[Criterion], WeightingServiceError> {
        let criteria = self.registry.criteria(category);
        if criteria.is_empty() {
            return Err(ScoringError::UnknownCategory(category.to_string()).into());
        }
        Ok(criteria)
    }

    pub fn weights(&self, category: &str) -> Result<Arc<WeightSet>, WeightingServiceError> {
        self.read()?
            .get(category)
            .cloned()
            .ok_or_else(|| ScoringError::UnknownCategory(category.to_string()).into())
    }

    pub fn view(&self, category: &str) -> Result<WeightSetView, WeightingServiceError> {
        let weights = self.weights(category)?;
        Ok(WeightSetView::from_weights(
            &weights,
            self.config.weight_target,
        ))
    }

    /// Clamp and apply a weight, persist the category and publish the new
    /// snapshot.
    pub fn set_weight(
        &self,
        category: &str,
        key: &str,
        value: f64,
    ) -> Result<Arc<WeightSet>, WeightingServiceError> {
        let mut snapshots = self.write()?;
        let current = snapshots
            .get(category)
            .ok_or_else(|| ScoringError::UnknownCategory(category.to_string()))?;

        let next = Arc::new(current.set_weight(key, value)?);
        settings::persist(&next, self.store.as_ref(), SERVICE_ORIGIN)?;
        snapshots.insert(category.to_string(), Arc::clone(&next));

        debug!(category, key, total = next.total_weight(), "published weight snapshot");
        Ok(next)
    }

    pub fn rank(
        &self,
        category: &str,
        candidates: Vec<CandidateInput>,
    ) -> Result<Vec<RankedCandidate<String>>, WeightingServiceError> {
        let weights = self.weights(category)?;
        let ranked = self.engine.rank(
            &weights,
            candidates
                .into_iter()
                .map(|candidate| (candidate.id, candidate.features)),
        )?;
        Ok(ranked)
    }

    /// Score a single feature vector against the current snapshot.
    pub fn score(
        &self,
        category: &str,
        features: &FeatureVector,
    ) -> Result<ScoreResult, WeightingServiceError> {
        let weights = self.weights(category)?;
        Ok(self.engine.score(&weights, features)?)
    }

    /// Restore store defaults and rebuild every snapshot from them.
    pub fn reset(&self) -> Result<(), WeightingServiceError> {
        let mut snapshots = self.write()?;
        self.store.reset()?;
        *snapshots = load_snapshots(&self.registry, self.store.as_ref())?;
        info!(categories = snapshots.len(), "weights reset to defaults");
        Ok(())
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<String, Arc<WeightSet>>>, WeightingServiceError> {
        self.snapshots
            .read()
            .map_err(|_| WeightingServiceError::Poisoned)
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Arc<WeightSet>>>, WeightingServiceError> {
        self.snapshots
            .write()
            .map_err(|_| WeightingServiceError::Poisoned)
    }
}

fn load_snapshots<S>(
    registry: &CriterionRegistry,
    store: &S,
) -> Result<BTreeMap<String, Arc<WeightSet>>, SettingsError>
where
    S: SettingsStore + ?Sized,
{
    registry
        .categories()
        .map(|category| {
            settings::rehydrate(registry, store, category)
                .map(|weights| (category.to_string(), Arc::new(weights)))
        })
        .collect()
}

/// Error raised by the weighting service.
#[derive(Debug, thiserror::Error)]
pub enum WeightingServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("weight snapshots are unavailable after a panic")]
    Poisoned,
}
