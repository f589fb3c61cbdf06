use tracing::{debug, warn};

use super::store::{SettingKind, SettingValue, SettingsError, SettingsStore};
use crate::scoring::{CriterionRegistry, WeightSet};

/// Rebuild a category's weights from defaults plus every stored numeric
/// entry. Keys the registry does not know, and non-numeric values, are
/// skipped so newer settings never break an older build.
pub fn rehydrate<S>(
    registry: &CriterionRegistry,
    store: &S,
    category: &str,
) -> Result<WeightSet, SettingsError>
where
    S: SettingsStore + ?Sized,
{
    let mut weights = WeightSet::from_registry(registry, category);

    for entry in store
        .get_all()?
        .into_iter()
        .filter(|entry| entry.category == category)
    {
        if registry.criterion(category, &entry.key).is_none() {
            warn!(category, key = %entry.key, "ignoring unregistered weight setting");
            continue;
        }

        let Some(value) = entry.value.as_number() else {
            warn!(category, key = %entry.key, kind = ?entry.kind, "ignoring non-numeric weight setting");
            continue;
        };

        match weights.set_weight(&entry.key, value) {
            Ok(next) => weights = next,
            Err(err) => warn!(category, key = %entry.key, error = %err, "ignoring stored weight"),
        }
    }

    debug!(category, total = weights.total_weight(), "rehydrated weights");
    Ok(weights)
}

/// Write every base weight of `weights` to the store.
pub fn persist<S>(weights: &WeightSet, store: &S, origin: &str) -> Result<(), SettingsError>
where
    S: SettingsStore + ?Sized,
{
    for (key, weight) in weights.weights() {
        store.set(
            weights.category(),
            key,
            SettingValue::Number(weight),
            SettingKind::Number,
            origin,
        )?;
    }
    Ok(())
}
