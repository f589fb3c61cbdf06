use crate::scoring::catalog::RECOVERY_OPTIONS_RANKING;
use crate::scoring::{Criterion, CriterionRegistry, FeatureVector, WeightSet};

pub(super) const TARGET: f64 = 100.0;

pub(super) fn recovery_weights() -> WeightSet {
    WeightSet::from_registry(&CriterionRegistry::standard(), RECOVERY_OPTIONS_RANKING)
}

pub(super) fn two_criteria_registry() -> CriterionRegistry {
    let mut registry = CriterionRegistry::new();
    registry
        .register_criterion("demo", Criterion::keyed("a").with_default(50.0))
        .expect("a registers");
    registry
        .register_criterion("demo", Criterion::keyed("b").with_default(50.0))
        .expect("b registers");
    registry
}

pub(super) fn even_weights() -> WeightSet {
    WeightSet::from_registry(&two_criteria_registry(), "demo")
}

pub(super) fn features(pairs: &[(&str, f64)]) -> FeatureVector {
    pairs.iter().map(|(key, value)| (*key, *value)).collect()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
