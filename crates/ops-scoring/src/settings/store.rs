use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored setting value. Weights are always numbers; the other shapes are
/// carried for the non-weight categories that share the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Json(serde_json::Value),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Boolean(_) => SettingKind::Boolean,
            SettingValue::Number(_) => SettingKind::Number,
            SettingValue::Text(_) => SettingKind::String,
            SettingValue::Json(_) => SettingKind::Object,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Boolean,
    Number,
    String,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub category: String,
    pub key: String,
    pub value: SettingValue,
    #[serde(rename = "type")]
    pub kind: SettingKind,
    pub origin: String,
    pub updated_at: DateTime<Utc>,
}

/// Key/value settings persistence keyed by `(category, key)`. No
/// transactional semantics are assumed.
pub trait SettingsStore: Send + Sync {
    fn get(&self, category: &str, key: &str) -> Result<Option<SettingEntry>, SettingsError>;
    fn set(
        &self,
        category: &str,
        key: &str,
        value: SettingValue,
        kind: SettingKind,
        origin: &str,
    ) -> Result<(), SettingsError>;
    fn get_all(&self) -> Result<Vec<SettingEntry>, SettingsError>;
    fn reset(&self) -> Result<(), SettingsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("settings payload invalid: {0}")]
    Serialization(#[from] serde_json::Error),
}
