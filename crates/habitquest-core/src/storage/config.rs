//! TOML-based engine configuration.
//!
//! Stores the tunable knobs of the rules engine:
//! - Calendar offset for day-boundary logic
//! - Engagement-coin cap and weekly reset window
//!
//! Configuration is stored at `~/.config/habitquest/config.toml`. A missing
//! file yields defaults; missing keys fill in per-field defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, Result};

fn value_at_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_value_at_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(ConfigError::ParseFailed("config key is empty".to_string()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::ParseFailed(format!("unknown config key: {key}")))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::ParseFailed(format!("unknown config key: {key}")))?;

            // Every settable knob is numeric; section names are not leaves.
            let new_value = match existing {
                serde_json::Value::Number(_) => {
                    let parsed = value.parse::<i64>().map_err(|_| {
                        ConfigError::ParseFailed(format!("cannot parse '{value}' as number"))
                    })?;
                    serde_json::Value::Number(parsed.into())
                }
                _ => {
                    return Err(ConfigError::ParseFailed(format!(
                        "'{key}' is not a settable value"
                    )))
                }
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }
        current = current
            .get_mut(part)
            .ok_or_else(|| ConfigError::ParseFailed(format!("unknown config key: {key}")))?;
    }
    Ok(())
}

/// Calendar clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Fixed offset from UTC in minutes, applied before truncating to a
    /// calendar day. Defaults to +05:30.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

/// Economy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Base engagement-coin cap at level 0.
    #[serde(default = "default_engagement_cap_base")]
    pub engagement_cap_base: i64,
    /// Cap growth per profile level.
    #[serde(default = "default_engagement_cap_per_level")]
    pub engagement_cap_per_level: i64,
    /// Days after which the engagement balance lazily resets.
    #[serde(default = "default_engagement_reset_days")]
    pub engagement_reset_days: i64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/habitquest/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
}

fn default_utc_offset_minutes() -> i32 {
    330
}

fn default_engagement_cap_base() -> i64 {
    70
}

fn default_engagement_cap_per_level() -> i64 {
    5
}

fn default_engagement_reset_days() -> i64 {
    7
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            engagement_cap_base: default_engagement_cap_base(),
            engagement_cap_per_level: default_engagement_cap_per_level(),
            engagement_reset_days: default_engagement_reset_days(),
        }
    }
}

impl EngineConfig {
    fn config_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save the configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    /// Get a config value as a string by dot-separated key
    /// (e.g. `"clock.utc_offset_minutes"`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = value_at_path(&json, key)?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist the result.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value does not parse,
    /// or the file cannot be written.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        set_value_at_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_rules() {
        let config = EngineConfig::default();
        assert_eq!(config.clock.utc_offset_minutes, 330);
        assert_eq!(config.economy.engagement_cap_base, 70);
        assert_eq!(config.economy.engagement_cap_per_level, 5);
        assert_eq!(config.economy.engagement_reset_days, 7);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            "[economy]\nengagement_cap_base = 100\n",
        )
        .unwrap();
        assert_eq!(config.economy.engagement_cap_base, 100);
        assert_eq!(config.economy.engagement_cap_per_level, 5);
        assert_eq!(config.clock.utc_offset_minutes, 330);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EngineConfig::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.economy.engagement_reset_days, 7);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let config = EngineConfig::default();
        assert_eq!(config.get("clock.utc_offset_minutes").as_deref(), Some("330"));
        assert_eq!(config.get("economy.engagement_cap_base").as_deref(), Some("70"));
        assert!(config.get("economy.missing_key").is_none());
        assert!(config.get("").is_none());
    }

    #[test]
    fn set_path_updates_nested_number() {
        let mut json = serde_json::to_value(EngineConfig::default()).unwrap();
        set_value_at_path(&mut json, "clock.utc_offset_minutes", "-300").unwrap();
        let parsed: EngineConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.clock.utc_offset_minutes, -300);
    }

    #[test]
    fn set_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(EngineConfig::default()).unwrap();
        assert!(set_value_at_path(&mut json, "clock.nonexistent", "1").is_err());
        assert!(set_value_at_path(&mut json, "", "1").is_err());
    }

    #[test]
    fn set_path_rejects_non_numeric_value() {
        let mut json = serde_json::to_value(EngineConfig::default()).unwrap();
        assert!(set_value_at_path(&mut json, "economy.engagement_cap_base", "lots").is_err());
    }

    #[test]
    fn set_path_rejects_section_as_leaf() {
        let mut json = serde_json::to_value(EngineConfig::default()).unwrap();
        assert!(set_value_at_path(&mut json, "economy", "5").is_err());
    }
}
