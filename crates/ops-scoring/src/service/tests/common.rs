use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::ScoringConfig;
use crate::scoring::{CriterionRegistry, FeatureVector};
use crate::service::{CandidateInput, WeightingService};
use crate::settings::{
    InMemorySettingsStore, SettingEntry, SettingKind, SettingValue, SettingsError, SettingsStore,
};

pub(super) fn build_service() -> (WeightingService<InMemorySettingsStore>, Arc<InMemorySettingsStore>) {
    let store = Arc::new(InMemorySettingsStore::new());
    let service = WeightingService::new(
        CriterionRegistry::standard(),
        Arc::clone(&store),
        ScoringConfig::default(),
    )
    .expect("service builds");
    (service, store)
}

pub(super) fn candidate(id: &str, features: &[(&str, f64)]) -> CandidateInput {
    CandidateInput {
        id: id.to_string(),
        features: features
            .iter()
            .map(|(key, value)| (*key, *value))
            .collect::<FeatureVector>(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Serves the seeded defaults but refuses every write.
#[derive(Debug, Default)]
pub(super) struct ReadOnlyStore {
    inner: InMemorySettingsStore,
}

impl SettingsStore for ReadOnlyStore {
    fn get(&self, category: &str, key: &str) -> Result<Option<SettingEntry>, SettingsError> {
        self.inner.get(category, key)
    }

    fn set(
        &self,
        _category: &str,
        _key: &str,
        _value: SettingValue,
        _kind: SettingKind,
        _origin: &str,
    ) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("read-only".into()))
    }

    fn get_all(&self) -> Result<Vec<SettingEntry>, SettingsError> {
        self.inner.get_all()
    }

    fn reset(&self) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("read-only".into()))
    }
}
