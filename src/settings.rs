//! Persisted feed settings.
//!
//! One settings record per installation, stored as flat key/value rows under
//! the `pazaruvajsettings.` prefix. Installing writes the defaults, uninstalling
//! deletes every row with the prefix.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Key prefix shared by every settings row.
pub const SETTINGS_PREFIX: &str = "pazaruvajsettings.";

#[derive(Debug, Error)]
pub enum SettingsError {
    /// A stored value is not valid JSON or does not fit the field type.
    #[error("Invalid setting '{key}': {source}")]
    Invalid {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The settings value did not flatten into named fields.
    #[error("Settings must serialize to a key/value record, got {0}")]
    NotARecord(&'static str),
}

/// Feed behavior the admin can tune without touching code.
///
/// The category labels must match the catalog's category names exactly
/// (case-insensitively). A Bulgarian catalog would use `Часовници`, `Мъжки`
/// and `Дамски`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// File written under `files/exportimport/`.
    pub feed_file_name: String,
    /// Fixed first breadcrumb level.
    pub top_category: String,
    pub men_category: String,
    pub women_category: String,
    pub breadcrumb_separator: String,
    pub delivery_time_days: u32,
    pub delivery_cost: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            feed_file_name: "pazaruvaj.xml".to_string(),
            top_category: "Watches".to_string(),
            men_category: "Men".to_string(),
            women_category: "Women".to_string(),
            breadcrumb_separator: " > ".to_string(),
            delivery_time_days: 1,
            delivery_cost: "Free".to_string(),
        }
    }
}

impl FeedSettings {
    /// Flatten into `(prefixed key, JSON value)` rows, ordered by key.
    pub fn to_entries(&self) -> Result<Vec<(String, String)>, SettingsError> {
        let value = serde_json::to_value(self).map_err(SettingsError::Serialize)?;
        let fields = match value {
            Value::Object(fields) => fields,
            other => return Err(SettingsError::NotARecord(json_kind(&other))),
        };

        let mut entries: Vec<(String, String)> = fields
            .into_iter()
            .map(|(key, value)| (format!("{}{}", SETTINGS_PREFIX, key), value.to_string()))
            .collect();
        entries.sort();
        Ok(entries)
    }

    /// Rebuild from stored rows. Unknown keys are ignored, missing keys take
    /// their default.
    pub fn from_entries<I>(entries: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields = Map::new();
        for (key, raw) in entries {
            let Some(field) = key.strip_prefix(SETTINGS_PREFIX) else {
                continue;
            };
            let value: Value = serde_json::from_str(&raw).map_err(|source| {
                SettingsError::Invalid {
                    key: key.clone(),
                    source,
                }
            })?;
            fields.insert(field.to_string(), value);
        }

        serde_json::from_value(Value::Object(fields)).map_err(|source| SettingsError::Invalid {
            key: SETTINGS_PREFIX.trim_end_matches('.').to_string(),
            source,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = FeedSettings::default();
        assert_eq!(settings.feed_file_name, "pazaruvaj.xml");
        assert_eq!(settings.top_category, "Watches");
        assert_eq!(settings.breadcrumb_separator, " > ");
        assert_eq!(settings.delivery_time_days, 1);
        assert_eq!(settings.delivery_cost, "Free");
    }

    #[test]
    fn test_entries_are_prefixed_json() {
        let entries = FeedSettings::default().to_entries().unwrap();
        assert_eq!(entries.len(), 7);
        assert!(entries.iter().all(|(k, _)| k.starts_with(SETTINGS_PREFIX)));
        assert!(entries.contains(&(
            "pazaruvajsettings.delivery_time_days".to_string(),
            "1".to_string()
        )));
        assert!(entries.contains(&(
            "pazaruvajsettings.delivery_cost".to_string(),
            "\"Free\"".to_string()
        )));
    }

    #[test]
    fn test_entries_rebuild_settings() {
        let settings = FeedSettings {
            top_category: "Часовници".to_string(),
            men_category: "Мъжки".to_string(),
            women_category: "Дамски".to_string(),
            ..FeedSettings::default()
        };

        let rebuilt = FeedSettings::from_entries(settings.to_entries().unwrap()).unwrap();
        assert_eq!(rebuilt, settings);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let entries = vec![(
            "pazaruvajsettings.delivery_cost".to_string(),
            "\"5.00\"".to_string(),
        )];
        let settings = FeedSettings::from_entries(entries).unwrap();
        assert_eq!(settings.delivery_cost, "5.00");
        assert_eq!(settings.feed_file_name, "pazaruvaj.xml");
    }

    #[test]
    fn test_foreign_keys_ignored() {
        let entries = vec![("othersettings.x".to_string(), "not json".to_string())];
        assert_eq!(
            FeedSettings::from_entries(entries).unwrap(),
            FeedSettings::default()
        );
    }

    #[test]
    fn test_invalid_value_reports_key() {
        let entries = vec![(
            "pazaruvajsettings.delivery_time_days".to_string(),
            "\"soon\"".to_string(),
        )];
        let err = FeedSettings::from_entries(entries).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_non_record_value_is_error() {
        assert_eq!(json_kind(&Value::Array(Vec::new())), "an array");
        let err = SettingsError::NotARecord(json_kind(&Value::Null));
        assert_eq!(
            err.to_string(),
            "Settings must serialize to a key/value record, got null"
        );
    }
}
