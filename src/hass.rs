//! Bridge to the home-automation host.
//!
//! # Architecture
//!
//! The host owns all device communication. It hands the card two things
//! through the filesystem:
//!
//! - a snapshot file: one JSON object mapping entity ids to their current
//!   state and attributes, rewritten by the host whenever anything changes
//! - an action file: the card appends one JSON line per outbound request
//!   (show details, switch on/off) for the host to pick up
//!
//! # Graceful degradation
//!
//! A missing or half-written snapshot file is never an error - the card keeps
//! rendering the last derived data and retries on the next tick. Outbound
//! requests are fire-and-forget: call sites use `.ok()`, no retry, no queue.
//! The next snapshot refresh is the only feedback the card ever sees.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;

use crate::config::HostConfig;

/// Current state of one host entity: a state string plus free-form attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityState {
    pub state: String,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl EntityState {
    /// Numeric reading parsed from the textual state. Non-numeric states
    /// ("unavailable", "unknown", ...) yield None, never an error.
    pub fn numeric_state(&self) -> Option<f64> {
        self.state.trim().parse::<f64>().ok()
    }

    pub fn is_on(&self) -> bool {
        self.state == "on"
    }

    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn number_attribute(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(|v| v.as_f64())
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.str_attribute("friendly_name")
    }

    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.str_attribute("unit_of_measurement")
    }
}

/// Read-only view of the host's entity states at one point in time.
///
/// The card looks entities up during one derivation pass and drops the
/// snapshot afterwards; it never mutates or retains it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    states: HashMap<String, EntityState>,
}

impl StateSnapshot {
    pub fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    /// Lookup + numeric parse in one step; absent entity behaves the same
    /// as a non-numeric state.
    pub fn numeric_state(&self, entity_id: &str) -> Option<f64> {
        self.entity(entity_id).and_then(EntityState::numeric_state)
    }
}

/// Outbound request to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HostRequest {
    /// Ask the host to open its detail view for an entity
    ShowDetails { entity_id: String },
    /// Ask the host to invoke a service on an entity
    CallService {
        domain: String,
        service: String,
        entity_id: String,
    },
}

impl HostRequest {
    pub fn show_details(entity_id: impl Into<String>) -> Self {
        Self::ShowDetails {
            entity_id: entity_id.into(),
        }
    }

    /// Switch service call with the service picked from the desired state
    pub fn turn_switch(entity_id: impl Into<String>, on: bool) -> Self {
        let service = if on { "turn_on" } else { "turn_off" };
        Self::CallService {
            domain: "switch".to_string(),
            service: service.to_string(),
            entity_id: entity_id.into(),
        }
    }
}

/// File-based host connection
pub struct HostBridge {
    states_file: PathBuf,
    actions_file: PathBuf,
    last_seen: Option<SystemTime>,
}

impl HostBridge {
    pub fn new(config: &HostConfig) -> Self {
        tracing::info!(
            "Host bridge: states from {}, actions to {}",
            config.states_file.display(),
            config.actions_file.display()
        );
        Self {
            states_file: config.states_file.clone(),
            actions_file: config.actions_file.clone(),
            last_seen: None,
        }
    }

    /// Returns a fresh snapshot when the host has rewritten the states file
    /// since the last poll, None otherwise. Cheap mtime check per tick.
    pub fn poll_snapshot(&mut self) -> Option<StateSnapshot> {
        let modified = std::fs::metadata(&self.states_file)
            .and_then(|m| m.modified())
            .ok()?;
        if self.last_seen == Some(modified) {
            return None;
        }

        let content = match std::fs::read_to_string(&self.states_file) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Host snapshot not readable: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<StateSnapshot>(&content) {
            Ok(snapshot) => {
                self.last_seen = Some(modified);
                Some(snapshot)
            }
            Err(e) => {
                // Host may be mid-write; leave last_seen alone and retry next tick
                tracing::debug!("Host snapshot not parseable yet: {}", e);
                None
            }
        }
    }

    /// Append one request line for the host. Call sites treat this as
    /// fire-and-forget; a failed append is invisible to the card.
    pub async fn send(&self, request: &HostRequest) -> Result<()> {
        let mut line =
            serde_json::to_string(request).context("Failed to encode host request")?;
        line.push('\n');

        if let Some(parent) = self.actions_file.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.actions_file)
            .await
            .with_context(|| {
                format!("Failed to open action file {}", self.actions_file.display())
            })?;
        file.write_all(line.as_bytes())
            .await
            .context("Failed to append host request")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "climate.living_room": {
                "state": "heat",
                "attributes": {"temperature": 21.5, "hvac_action": "heating"}
            },
            "sensor.living_room_temperature": {"state": "20.3"}
        }"#;
        let snapshot: StateSnapshot = serde_json::from_str(json).unwrap();

        let climate = snapshot.entity("climate.living_room").unwrap();
        assert_eq!(climate.state, "heat");
        assert_eq!(climate.number_attribute("temperature"), Some(21.5));
        assert_eq!(climate.str_attribute("hvac_action"), Some("heating"));

        // attributes key entirely absent is fine
        let sensor = snapshot.entity("sensor.living_room_temperature").unwrap();
        assert!(sensor.attributes.is_empty());
        assert_eq!(sensor.numeric_state(), Some(20.3));

        assert!(snapshot.entity("sensor.nope").is_none());
    }

    #[test]
    fn test_numeric_state() {
        let parse = |state: &str| {
            serde_json::from_str::<EntityState>(&format!(r#"{{"state": "{state}"}}"#))
                .unwrap()
                .numeric_state()
        };
        assert_eq!(parse("21.5"), Some(21.5));
        assert_eq!(parse(" 21.5 "), Some(21.5));
        assert_eq!(parse("-3"), Some(-3.0));
        assert_eq!(parse("unavailable"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_request_encoding() {
        let details = HostRequest::show_details("climate.living_room");
        assert_eq!(
            serde_json::to_string(&details).unwrap(),
            r#"{"action":"show_details","entity_id":"climate.living_room"}"#
        );

        let on = HostRequest::turn_switch("switch.bathroom_heater", true);
        assert_eq!(
            on,
            HostRequest::CallService {
                domain: "switch".to_string(),
                service: "turn_on".to_string(),
                entity_id: "switch.bathroom_heater".to_string(),
            }
        );
        let off = HostRequest::turn_switch("switch.bathroom_heater", false);
        assert_eq!(
            serde_json::to_string(&off).unwrap(),
            r#"{"action":"call_service","domain":"switch","service":"turn_off","entity_id":"switch.bathroom_heater"}"#
        );
    }
}
