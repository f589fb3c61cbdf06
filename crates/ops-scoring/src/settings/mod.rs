//! Settings-store collaborator: the persistence contract the weights are
//! loaded from and saved to.

mod memory;
mod store;
mod weights;

pub use memory::InMemorySettingsStore;
pub use store::{SettingEntry, SettingKind, SettingValue, SettingsError, SettingsStore};
pub use weights::{persist, rehydrate};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::catalog::{
        AIRCRAFT_SELECTION, PASSENGER_PRIORITIZATION, RECOVERY_OPTIONS_RANKING,
    };
    use crate::scoring::{CriterionRegistry, WeightSet};

    #[test]
    fn seeds_defaults_and_resets() {
        let store = InMemorySettingsStore::new();
        let cost = store
            .get(RECOVERY_OPTIONS_RANKING, "costWeight")
            .expect("store available")
            .expect("seeded");
        assert_eq!(cost.value, SettingValue::Number(30.0));
        assert_eq!(cost.kind, SettingKind::Number);
        assert_eq!(cost.origin, "system");

        store
            .set(
                RECOVERY_OPTIONS_RANKING,
                "costWeight",
                SettingValue::Number(45.0),
                SettingKind::Number,
                "ops-controller",
            )
            .expect("store available");
        let updated = store
            .get(RECOVERY_OPTIONS_RANKING, "costWeight")
            .expect("store available")
            .expect("present");
        assert_eq!(updated.value, SettingValue::Number(45.0));
        assert_eq!(updated.origin, "ops-controller");

        store.reset().expect("store available");
        let restored = store
            .get(RECOVERY_OPTIONS_RANKING, "costWeight")
            .expect("store available")
            .expect("seeded");
        assert_eq!(restored.value, SettingValue::Number(30.0));
    }

    #[test]
    fn rehydrate_applies_stored_weights_and_ignores_unknown_keys() {
        let registry = CriterionRegistry::standard();
        let store = InMemorySettingsStore::new();
        store
            .set(
                PASSENGER_PRIORITIZATION,
                "loyaltyTier",
                SettingValue::Number(40.0),
                SettingKind::Number,
                "test",
            )
            .expect("store available");
        store
            .set(
                PASSENGER_PRIORITIZATION,
                "futureCriterion",
                SettingValue::Number(5.0),
                SettingKind::Number,
                "test",
            )
            .expect("store available");
        store
            .set(
                PASSENGER_PRIORITIZATION,
                "groupSize",
                SettingValue::Text("fifteen".to_string()),
                SettingKind::String,
                "test",
            )
            .expect("store available");
        store
            .set(
                PASSENGER_PRIORITIZATION,
                "ticketClass",
                SettingValue::Number(400.0),
                SettingKind::Number,
                "test",
            )
            .expect("store available");

        let weights = rehydrate(&registry, &store, PASSENGER_PRIORITIZATION).expect("loads");

        assert_eq!(weights.weight("loyaltyTier"), Some(40.0));
        assert_eq!(weights.weight("futureCriterion"), None);
        assert_eq!(weights.weight("groupSize"), Some(15.0));
        assert_eq!(weights.weight("ticketClass"), Some(100.0));
    }

    #[test]
    fn persist_then_rehydrate_round_trips() {
        let registry = CriterionRegistry::standard();
        let store = InMemorySettingsStore::empty();

        let weights = WeightSet::from_registry(&registry, AIRCRAFT_SELECTION)
            .set_weight("fuelEfficiency", 35.0)
            .and_then(|weights| weights.set_weight("passengerCapacity", 0.0))
            .expect("known keys");
        persist(&weights, &store, "test").expect("store available");

        let reloaded = rehydrate(&registry, &store, AIRCRAFT_SELECTION).expect("loads");
        assert_eq!(
            reloaded.weights().collect::<Vec<_>>(),
            weights.weights().collect::<Vec<_>>()
        );
    }

    #[test]
    fn partial_storage_falls_back_to_defaults() {
        let registry = CriterionRegistry::standard();
        let store = InMemorySettingsStore::empty();
        store
            .set(
                AIRCRAFT_SELECTION,
                "routeSuitability",
                SettingValue::Number(10.0),
                SettingKind::Number,
                "test",
            )
            .expect("store available");

        let reloaded = rehydrate(&registry, &store, AIRCRAFT_SELECTION).expect("loads");
        let expected = WeightSet::from_registry(&registry, AIRCRAFT_SELECTION)
            .set_weight("routeSuitability", 10.0)
            .expect("known key");
        assert_eq!(reloaded, expected);
    }

    #[test]
    fn export_and_import_json() {
        let source = InMemorySettingsStore::new();
        source
            .set(
                "nlpSettings",
                "language",
                SettingValue::Text("arabic".to_string()),
                SettingKind::String,
                "test",
            )
            .expect("store available");
        let payload = source.export_json().expect("serialises");

        let target = InMemorySettingsStore::empty();
        let imported = target.import_json(&payload).expect("parses");
        assert_eq!(imported, source.get_all().expect("store available").len());
        assert_eq!(
            target
                .get("nlpSettings", "language")
                .expect("store available")
                .map(|entry| entry.value),
            Some(SettingValue::Text("arabic".to_string()))
        );

        assert!(matches!(
            target.import_json("not json"),
            Err(SettingsError::Serialization(_))
        ));
    }

    #[test]
    fn delete_and_category_listing() {
        let store = InMemorySettingsStore::new();
        assert_eq!(
            store
                .by_category("nlpSettings")
                .expect("store available")
                .len(),
            4
        );
        assert!(store.delete("nlpSettings", "autoApply").expect("store available"));
        assert!(!store.delete("nlpSettings", "autoApply").expect("store available"));
        assert_eq!(
            store
                .by_category("nlpSettings")
                .expect("store available")
                .len(),
            3
        );
    }
}
