use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::store::{SettingEntry, SettingKind, SettingValue, SettingsError, SettingsStore};

const SYSTEM_ORIGIN: &str = "system";

/// Process-local store seeded with the operations defaults. Entries keep
/// their first insertion order.
#[derive(Debug, Clone)]
pub struct InMemorySettingsStore {
    entries: Arc<Mutex<Vec<SettingEntry>>>,
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(default_entries())),
        }
    }
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with no entries at all.
    pub fn empty() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn by_category(&self, category: &str) -> Result<Vec<SettingEntry>, SettingsError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|entry| entry.category == category)
            .cloned()
            .collect())
    }

    pub fn delete(&self, category: &str, key: &str) -> Result<bool, SettingsError> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|entry| !(entry.category == category && entry.key == key));
        Ok(entries.len() != before)
    }

    pub fn export_json(&self) -> Result<String, SettingsError> {
        let entries = self.lock()?;
        Ok(serde_json::to_string_pretty(&*entries)?)
    }

    /// Upsert every entry from an exported payload. Nothing is applied when
    /// the payload does not parse.
    pub fn import_json(&self, payload: &str) -> Result<usize, SettingsError> {
        let imported: Vec<SettingEntry> = serde_json::from_str(payload)?;
        let count = imported.len();
        let mut entries = self.lock()?;
        for entry in imported {
            upsert(&mut entries, entry);
        }
        info!(count, "imported settings");
        Ok(count)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<SettingEntry>>, SettingsError> {
        self.entries
            .lock()
            .map_err(|_| SettingsError::Unavailable("settings mutex poisoned".to_string()))
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, category: &str, key: &str) -> Result<Option<SettingEntry>, SettingsError> {
        Ok(self
            .lock()?
            .iter()
            .find(|entry| entry.category == category && entry.key == key)
            .cloned())
    }

    fn set(
        &self,
        category: &str,
        key: &str,
        value: SettingValue,
        kind: SettingKind,
        origin: &str,
    ) -> Result<(), SettingsError> {
        let mut entries = self.lock()?;
        upsert(&mut entries, entry(category, key, value, kind, origin));
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<SettingEntry>, SettingsError> {
        Ok(self.lock()?.clone())
    }

    fn reset(&self) -> Result<(), SettingsError> {
        let mut entries = self.lock()?;
        *entries = default_entries();
        info!(entries = entries.len(), "settings reset to defaults");
        Ok(())
    }
}

fn upsert(entries: &mut Vec<SettingEntry>, entry: SettingEntry) {
    match entries
        .iter_mut()
        .find(|existing| existing.category == entry.category && existing.key == entry.key)
    {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

fn entry(
    category: &str,
    key: &str,
    value: SettingValue,
    kind: SettingKind,
    origin: &str,
) -> SettingEntry {
    SettingEntry {
        category: category.to_string(),
        key: key.to_string(),
        value,
        kind,
        origin: origin.to_string(),
        updated_at: Utc::now(),
    }
}

fn default_entries() -> Vec<SettingEntry> {
    let defaults: Vec<(&str, &str, serde_json::Value)> = vec![
        ("operationalRules", "maxDelayThreshold", json!(180)),
        ("operationalRules", "minConnectionTime", json!(45)),
        ("operationalRules", "maxOverbooking", json!(105)),
        ("operationalRules", "priorityRebookingTime", json!(15)),
        ("operationalRules", "hotacTriggerDelay", json!(240)),
        ("recoveryConstraints", "maxAircraftSwaps", json!(3)),
        ("recoveryConstraints", "crewDutyTimeLimits", json!(true)),
        ("recoveryConstraints", "maintenanceSlotProtection", json!(true)),
        ("recoveryConstraints", "slotCoordinationRequired", json!(false)),
        ("recoveryConstraints", "curfewCompliance", json!(true)),
        ("automationSettings", "autoApproveThreshold", json!(95)),
        ("automationSettings", "requireManagerApproval", json!(false)),
        ("automationSettings", "enablePredictiveActions", json!(true)),
        ("automationSettings", "autoNotifyPassengers", json!(true)),
        ("automationSettings", "autoBookHotac", json!(false)),
        ("passengerPrioritization", "loyaltyTier", json!(25)),
        ("passengerPrioritization", "ticketClass", json!(20)),
        ("passengerPrioritization", "specialNeeds", json!(30)),
        ("passengerPrioritization", "groupSize", json!(15)),
        ("passengerPrioritization", "connectionRisk", json!(10)),
        ("recoveryOptionsRanking", "costWeight", json!(30)),
        ("recoveryOptionsRanking", "timeWeight", json!(25)),
        ("recoveryOptionsRanking", "passengerImpactWeight", json!(20)),
        ("recoveryOptionsRanking", "operationalComplexityWeight", json!(15)),
        ("recoveryOptionsRanking", "reputationWeight", json!(10)),
        ("nlpSettings", "enabled", json!(true)),
        ("nlpSettings", "language", json!("english")),
        ("nlpSettings", "confidence", json!(85)),
        ("nlpSettings", "autoApply", json!(false)),
        ("notificationSettings", "email", json!(true)),
        ("notificationSettings", "sms", json!(false)),
        ("notificationSettings", "push", json!(true)),
        ("notificationSettings", "desktop", json!(true)),
        ("notificationSettings", "recoveryAlerts", json!(true)),
        ("notificationSettings", "passengerUpdates", json!(true)),
        ("notificationSettings", "systemAlerts", json!(false)),
    ];

    defaults
        .into_iter()
        .map(|(category, key, raw)| {
            let value = match raw {
                serde_json::Value::Bool(flag) => SettingValue::Boolean(flag),
                serde_json::Value::Number(number) => {
                    SettingValue::Number(number.as_f64().unwrap_or_default())
                }
                serde_json::Value::String(text) => SettingValue::Text(text),
                other => SettingValue::Json(other),
            };
            let kind = value.kind();
            entry(category, key, value, kind, SYSTEM_ORIGIN)
        })
        .collect()
}
