//! Per-category view models derived from a host snapshot.
//!
//! ```text
//! host snapshot (entity id -> state)
//!        │
//!        ▼
//!   derive_views()          one wholesale pass, no diffing
//!        │
//!        ▼
//!   DerivedViews            what the UI renders
//! ```
//!
//! Missing data never fails derivation: an absent entity or a non-numeric
//! state becomes a None field (thermostats, heaters) or drops the record
//! (mold sensors). The UI turns None into placeholder dashes.

use crate::config::{Entities, HeaterEntry, ThermostatEntry};
use crate::hass::{EntityState, StateSnapshot};

/// Operating mode reported by a climate entity's state string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    Other,
}

impl HvacMode {
    fn parse(state: &str) -> Self {
        match state {
            "off" => Self::Off,
            "heat" => Self::Heat,
            "cool" => Self::Cool,
            _ => Self::Other,
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::Off
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Heat => "Heating",
            Self::Cool => "Cooling",
            Self::Other => "Auto",
        }
    }
}

/// What the climate entity is doing right now (`hvac_action` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacAction {
    Idle,
    Heating,
    Cooling,
    Other,
}

impl HvacAction {
    fn parse(action: &str) -> Self {
        match action {
            "heating" => Self::Heating,
            "cooling" => Self::Cooling,
            "idle" => Self::Idle,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThermostatView {
    pub name: String,
    pub climate_entity: String,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub hvac_mode: HvacMode,
    pub hvac_action: HvacAction,
}

#[derive(Debug, Clone)]
pub struct HeaterView {
    pub name: String,
    pub switch_entity: String,
    pub current_temperature: Option<f64>,
    pub is_on: bool,
}

#[derive(Debug, Clone)]
pub struct MoldSensorView {
    pub entity_id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default)]
pub struct DerivedViews {
    pub thermostats: Vec<ThermostatView>,
    pub heaters: Vec<HeaterView>,
    pub average_temperature: f64,
    pub mold_sensors: Vec<MoldSensorView>,
}

/// Recompute every view from scratch.
///
/// `previous_average` is returned as the average when no configured
/// temperature sensor yields a numeric reading: the displayed average goes
/// stale rather than resetting.
pub fn derive_views(
    entities: &Entities,
    snapshot: &StateSnapshot,
    previous_average: f64,
) -> DerivedViews {
    DerivedViews {
        thermostats: entities
            .thermostats
            .iter()
            .map(|entry| derive_thermostat(entry, snapshot))
            .collect(),
        heaters: entities
            .heaters
            .iter()
            .map(|entry| derive_heater(entry, snapshot))
            .collect(),
        average_temperature: average_temperature(&entities.temperature_sensors, snapshot)
            .unwrap_or(previous_average),
        mold_sensors: entities
            .mold_sensors
            .iter()
            .filter_map(|id| derive_mold_sensor(id, snapshot))
            .collect(),
    }
}

fn derive_thermostat(entry: &ThermostatEntry, snapshot: &StateSnapshot) -> ThermostatView {
    let climate = snapshot.entity(&entry.climate_entity);
    ThermostatView {
        name: entry.name.clone(),
        climate_entity: entry.climate_entity.clone(),
        current_temperature: snapshot.numeric_state(&entry.temperature_entity),
        target_temperature: climate.and_then(|e| e.number_attribute("temperature")),
        hvac_mode: climate.map_or(HvacMode::Off, |e| HvacMode::parse(&e.state)),
        hvac_action: climate
            .and_then(|e| e.str_attribute("hvac_action"))
            .map_or(HvacAction::Idle, HvacAction::parse),
    }
}

fn derive_heater(entry: &HeaterEntry, snapshot: &StateSnapshot) -> HeaterView {
    HeaterView {
        name: entry.name.clone(),
        switch_entity: entry.switch_entity.clone(),
        current_temperature: snapshot.numeric_state(&entry.temperature_entity),
        is_on: snapshot
            .entity(&entry.switch_entity)
            .is_some_and(EntityState::is_on),
    }
}

/// Mold sensors with no snapshot record or a non-numeric state are dropped
/// from the list entirely, not rendered as placeholders.
fn derive_mold_sensor(entity_id: &str, snapshot: &StateSnapshot) -> Option<MoldSensorView> {
    let entity = snapshot.entity(entity_id)?;
    let value = entity.numeric_state()?;
    Some(MoldSensorView {
        entity_id: entity_id.to_string(),
        name: entity
            .friendly_name()
            .map(str::to_string)
            .unwrap_or_else(|| short_name(entity_id)),
        value,
        unit: entity.unit_of_measurement().unwrap_or("").to_string(),
    })
}

/// Final dot-separated segment of an entity id, e.g. "sensor.bath_mold" -> "bath_mold"
fn short_name(entity_id: &str) -> String {
    entity_id
        .rsplit('.')
        .next()
        .unwrap_or(entity_id)
        .to_string()
}

fn average_temperature(sensor_ids: &[String], snapshot: &StateSnapshot) -> Option<f64> {
    let readings: Vec<f64> = sensor_ids
        .iter()
        .filter_map(|id| snapshot.numeric_state(id))
        .collect();
    if readings.is_empty() {
        None
    } else {
        Some(readings.iter().sum::<f64>() / readings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> StateSnapshot {
        serde_json::from_value(value).unwrap()
    }

    fn entities_with_thermostat() -> Entities {
        Entities {
            thermostats: vec![ThermostatEntry {
                name: "Living Room".to_string(),
                climate_entity: "climate.living_room".to_string(),
                temperature_entity: "sensor.living_room_temperature".to_string(),
            }],
            ..Entities::default()
        }
    }

    #[test]
    fn test_thermostat_fully_populated() {
        let snap = snapshot(json!({
            "climate.living_room": {
                "state": "heat",
                "attributes": {"temperature": 21.0, "hvac_action": "heating"}
            },
            "sensor.living_room_temperature": {"state": "19.4"}
        }));
        let views = derive_views(&entities_with_thermostat(), &snap, 0.0);

        let t = &views.thermostats[0];
        assert_eq!(t.name, "Living Room");
        assert_eq!(t.current_temperature, Some(19.4));
        assert_eq!(t.target_temperature, Some(21.0));
        assert_eq!(t.hvac_mode, HvacMode::Heat);
        assert_eq!(t.hvac_action, HvacAction::Heating);
        assert!(t.hvac_mode.is_active());
    }

    #[test]
    fn test_thermostat_absent_entities_default_off_idle() {
        let views = derive_views(&entities_with_thermostat(), &snapshot(json!({})), 0.0);

        let t = &views.thermostats[0];
        assert_eq!(t.current_temperature, None);
        assert_eq!(t.target_temperature, None);
        assert_eq!(t.hvac_mode, HvacMode::Off);
        assert_eq!(t.hvac_action, HvacAction::Idle);
        assert!(!t.hvac_mode.is_active());
    }

    #[test]
    fn test_thermostat_non_numeric_sensor_is_none() {
        let snap = snapshot(json!({
            "climate.living_room": {"state": "cool", "attributes": {}},
            "sensor.living_room_temperature": {"state": "unavailable"}
        }));
        let t = &derive_views(&entities_with_thermostat(), &snap, 0.0).thermostats[0];
        assert_eq!(t.current_temperature, None);
        assert_eq!(t.hvac_mode, HvacMode::Cool);
        // hvac_action attribute missing on a present entity still defaults to idle
        assert_eq!(t.hvac_action, HvacAction::Idle);
    }

    #[test]
    fn test_heater_states() {
        let entities = Entities {
            heaters: vec![
                HeaterEntry {
                    name: "Bathroom".to_string(),
                    switch_entity: "switch.bathroom_heater".to_string(),
                    temperature_entity: "sensor.bathroom_temperature".to_string(),
                },
                HeaterEntry {
                    name: "Guest Bath".to_string(),
                    switch_entity: "switch.guest_heater".to_string(),
                    temperature_entity: "sensor.guest_temperature".to_string(),
                },
            ],
            ..Entities::default()
        };
        let snap = snapshot(json!({
            "switch.bathroom_heater": {"state": "on"},
            "sensor.bathroom_temperature": {"state": "22.5"}
        }));
        let views = derive_views(&entities, &snap, 0.0);

        assert!(views.heaters[0].is_on);
        assert_eq!(views.heaters[0].current_temperature, Some(22.5));
        // absent switch and sensor: off with no reading
        assert!(!views.heaters[1].is_on);
        assert_eq!(views.heaters[1].current_temperature, None);
    }

    #[test]
    fn test_average_temperature() {
        let entities = Entities {
            temperature_sensors: vec![
                "sensor.a".to_string(),
                "sensor.b".to_string(),
                "sensor.c".to_string(),
                "sensor.broken".to_string(),
            ],
            ..Entities::default()
        };
        let snap = snapshot(json!({
            "sensor.a": {"state": "20.0"},
            "sensor.b": {"state": "22.0"},
            "sensor.c": {"state": "24.0"},
            "sensor.broken": {"state": "unavailable"}
        }));
        let views = derive_views(&entities, &snap, 0.0);
        assert_eq!(views.average_temperature, 22.0);
    }

    #[test]
    fn test_average_retained_when_no_valid_readings() {
        let entities = Entities {
            temperature_sensors: vec!["sensor.a".to_string()],
            ..Entities::default()
        };
        let snap = snapshot(json!({"sensor.a": {"state": "unavailable"}}));
        let views = derive_views(&entities, &snap, 21.7);
        assert_eq!(views.average_temperature, 21.7);
    }

    #[test]
    fn test_mold_sensors_absent_or_non_numeric_dropped() {
        let entities = Entities {
            mold_sensors: vec![
                "sensor.bathroom_mold_index".to_string(),
                "sensor.missing_mold".to_string(),
                "sensor.broken_mold".to_string(),
            ],
            ..Entities::default()
        };
        let snap = snapshot(json!({
            "sensor.bathroom_mold_index": {
                "state": "2.4",
                "attributes": {"friendly_name": "Bathroom Mold", "unit_of_measurement": "idx"}
            },
            "sensor.broken_mold": {"state": "unknown"}
        }));
        let views = derive_views(&entities, &snap, 0.0);

        assert_eq!(views.mold_sensors.len(), 1);
        let m = &views.mold_sensors[0];
        assert_eq!(m.entity_id, "sensor.bathroom_mold_index");
        assert_eq!(m.name, "Bathroom Mold");
        assert_eq!(m.value, 2.4);
        assert_eq!(m.unit, "idx");
    }

    #[test]
    fn test_mold_sensor_name_falls_back_to_id_suffix() {
        let entities = Entities {
            mold_sensors: vec!["sensor.cellar_mold".to_string()],
            ..Entities::default()
        };
        let snap = snapshot(json!({"sensor.cellar_mold": {"state": "0.5"}}));
        let views = derive_views(&entities, &snap, 0.0);
        assert_eq!(views.mold_sensors[0].name, "cellar_mold");
        assert_eq!(views.mold_sensors[0].unit, "");
    }
}
