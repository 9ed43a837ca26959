use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ui::Theme;

/// Card configuration, supplied by the dashboard host as a TOML file.
///
/// The `entities` table is the only required part: without it the card has
/// nothing to render and refuses the configuration. Everything else falls
/// back to defaults. Entity identifiers are not checked here - a stale or
/// misspelled id simply shows up as dashes at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    /// Display title shown in the card header
    pub name: Option<String>,
    /// Category -> entity mapping (required)
    pub entities: Option<Entities>,
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Entities {
    pub thermostats: Vec<ThermostatEntry>,
    pub heaters: Vec<HeaterEntry>,
    pub temperature_sensors: Vec<String>,
    pub mold_sensors: Vec<String>,
}

/// One thermostat: a climate entity for mode/target plus a separate
/// temperature sensor for the measured value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatEntry {
    pub name: String,
    pub climate_entity: String,
    pub temperature_entity: String,
}

/// One electric heater: a switch entity plus its temperature sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaterEntry {
    pub name: String,
    pub switch_entity: String,
    pub temperature_entity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Tab to open on startup: "thermostats", "heaters", "temperature", "mold".
    /// Unknown values are ignored and the built-in default stands.
    pub default_tab: Option<String>,
    /// Render every non-empty category at once and hide the tab strip
    pub show_all: bool,
}

/// Where the host bridge reads snapshots and writes action requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub states_file: PathBuf,
    pub actions_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset: "dark" or "light"
    pub theme: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        let data = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            states_file: data.join("clima-card/states.json"),
            actions_file: data.join("clima-card/actions.jsonl"),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
        }
    }
}

/// The one hard configuration failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("card configuration must define an `entities` table")]
    MissingEntities,
}

impl CardConfig {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a configuration without an entity mapping. Called by `load`,
    /// exposed separately for configurations built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entities.is_none() {
            return Err(ConfigError::MissingEntities);
        }
        Ok(())
    }

    /// Card header title
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("Home Climate")
    }

    pub fn resolve_theme(&self) -> Theme {
        Theme::from_preset(&self.appearance.theme).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> CardConfig {
        toml::from_str(toml_str).expect("config should parse")
    }

    #[test]
    fn test_full_config_parses() {
        let config = parse(
            r#"
            name = "Climate"

            [options]
            default_tab = "heaters"
            show_all = false

            [appearance]
            theme = "light"

            [host]
            states_file = "/tmp/states.json"
            actions_file = "/tmp/actions.jsonl"

            [entities]
            temperature_sensors = ["sensor.living_room_temperature"]
            mold_sensors = ["sensor.bathroom_mold_index"]

            [[entities.thermostats]]
            name = "Living Room"
            climate_entity = "climate.living_room"
            temperature_entity = "sensor.living_room_temperature"

            [[entities.heaters]]
            name = "Bathroom"
            switch_entity = "switch.bathroom_heater"
            temperature_entity = "sensor.bathroom_temperature"
            "#,
        );

        assert!(config.validate().is_ok());
        assert_eq!(config.title(), "Climate");
        assert_eq!(config.options.default_tab.as_deref(), Some("heaters"));
        assert_eq!(config.appearance.theme, "light");

        let entities = config.entities.unwrap();
        assert_eq!(entities.thermostats.len(), 1);
        assert_eq!(entities.thermostats[0].climate_entity, "climate.living_room");
        assert_eq!(entities.heaters[0].switch_entity, "switch.bathroom_heater");
        assert_eq!(entities.temperature_sensors.len(), 1);
        assert_eq!(entities.mold_sensors.len(), 1);
    }

    #[test]
    fn test_missing_entities_is_rejected() {
        let config = parse(
            r#"
            name = "Climate"

            [options]
            show_all = true
            "#,
        );
        assert_eq!(config.validate(), Err(ConfigError::MissingEntities));
    }

    #[test]
    fn test_empty_entities_table_is_accepted() {
        // An empty mapping is valid - categories just render empty
        let config = parse("[entities]\n");
        assert!(config.validate().is_ok());
        let entities = config.entities.unwrap();
        assert!(entities.thermostats.is_empty());
        assert!(entities.mold_sensors.is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = parse("[entities]\n");
        assert_eq!(config.title(), "Home Climate");
        assert_eq!(config.options.default_tab, None);
        assert!(!config.options.show_all);
        assert_eq!(config.appearance.theme, "dark");
    }
}
