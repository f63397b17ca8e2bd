//! Scenario loading, parsing, and validation logic.
//!
//! A scenario file declares the monitored radios and a time-ordered list of
//! radio-state-change events. Scenarios are JSON, parsed with serde and
//! validated before the replay starts.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::energy::replay::TimedEvent;
use crate::energy::types::{MAX_RADIO_COUNT, RadioMode, RadioStateChange, SimTime};
use embassy_time::Duration;

/// Error type for scenario loading failures.
#[derive(Debug)]
pub enum ScenarioLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioLoadError::FileReadError(msg) => write!(f, "Failed to read file: {}", msg),
            ScenarioLoadError::ParseError(msg) => write!(f, "Failed to parse JSON: {}", msg),
            ScenarioLoadError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ScenarioLoadError {}

/// A radio declared in the scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RadioDecl {
    pub radio_id: u32,
    /// Mode at observation start; the sleep tracker is seeded from this, it
    /// is not assumed to be Off.
    pub initial_mode: RadioMode,
    /// Name of the power profile to use; the built-in preset when absent.
    #[serde(default)]
    pub profile: Option<String>,
}

/// One scheduled state-change event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduledEvent {
    /// Virtual time of the change, milliseconds from run start.
    pub at_ms: u64,
    pub radio_id: u32,
    pub change: RadioStateChange,
}

impl ScheduledEvent {
    pub fn at(&self) -> SimTime {
        Duration::from_millis(self.at_ms)
    }
}

/// Root structure representing an entire replay scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Scenario {
    pub radios: Vec<RadioDecl>,
    pub events: Vec<ScheduledEvent>,
}

impl Scenario {
    /// Loads and validates a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioLoadError> {
        let content = fs::read_to_string(path).map_err(|e| ScenarioLoadError::FileReadError(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parses and validates a scenario from a JSON string.
    pub fn parse(content: &str) -> Result<Self, ScenarioLoadError> {
        let scenario: Scenario = serde_json::from_str(content).map_err(|e| ScenarioLoadError::ParseError(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks the structural invariants the replay relies on:
    /// a radio count within the monitor task pool, unique radio ids, events
    /// referencing declared radios only, and non-decreasing event timestamps.
    fn validate(&self) -> Result<(), ScenarioLoadError> {
        if self.radios.is_empty() {
            return Err(ScenarioLoadError::ValidationError("scenario declares no radios".to_string()));
        }
        if self.radios.len() > MAX_RADIO_COUNT {
            return Err(ScenarioLoadError::ValidationError(format!(
                "scenario declares {} radios, at most {} are supported",
                self.radios.len(),
                MAX_RADIO_COUNT
            )));
        }

        let mut ids = HashSet::new();
        for radio in &self.radios {
            if !ids.insert(radio.radio_id) {
                return Err(ScenarioLoadError::ValidationError(format!(
                    "duplicate radio id {}",
                    radio.radio_id
                )));
            }
        }

        let mut previous_at = 0u64;
        for (index, event) in self.events.iter().enumerate() {
            if !ids.contains(&event.radio_id) {
                return Err(ScenarioLoadError::ValidationError(format!(
                    "event {} references unknown radio {}",
                    index, event.radio_id
                )));
            }
            if event.at_ms < previous_at {
                return Err(ScenarioLoadError::ValidationError(format!(
                    "event {} at {} ms is earlier than its predecessor at {} ms",
                    index, event.at_ms, previous_at
                )));
            }
            previous_at = event.at_ms;
        }

        Ok(())
    }

    /// Converts the schedule into the replay task's timeline entries.
    pub fn timeline(&self) -> Vec<TimedEvent> {
        self.events
            .iter()
            .map(|event| TimedEvent {
                at: event.at(),
                radio_id: event.radio_id,
                change: event.change,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::types::ReceptionState;

    const MINIMAL: &str = r#"{
        "radios": [
            { "radio-id": 1, "initial-mode": "receiver" },
            { "radio-id": 2, "initial-mode": "sleep", "profile": "cc2420" }
        ],
        "events": [
            { "at-ms": 0, "radio-id": 1, "change": { "kind": "reception-state", "value": "idle" } },
            { "at-ms": 5, "radio-id": 1, "change": { "kind": "mode", "value": "sleep" } },
            { "at-ms": 12, "radio-id": 2, "change": { "kind": "mode", "value": "receiver" } }
        ]
    }"#;

    #[test]
    fn minimal_scenario_parses() {
        let scenario = Scenario::parse(MINIMAL).unwrap();
        assert_eq!(scenario.radios.len(), 2);
        assert_eq!(scenario.events.len(), 3);
        assert_eq!(scenario.radios[1].profile.as_deref(), Some("cc2420"));
        assert_eq!(
            scenario.events[0].change,
            RadioStateChange::ReceptionState(ReceptionState::Idle)
        );
        assert_eq!(scenario.events[1].at(), Duration::from_millis(5));
    }

    #[test]
    fn timeline_preserves_order_and_times() {
        let scenario = Scenario::parse(MINIMAL).unwrap();
        let timeline = scenario.timeline();
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[2].radio_id, 2);
        assert_eq!(timeline[2].at, Duration::from_millis(12));
    }

    #[test]
    fn duplicate_radio_ids_are_rejected() {
        let json = r#"{
            "radios": [
                { "radio-id": 1, "initial-mode": "off" },
                { "radio-id": 1, "initial-mode": "off" }
            ],
            "events": []
        }"#;
        assert!(matches!(Scenario::parse(json), Err(ScenarioLoadError::ValidationError(_))));
    }

    #[test]
    fn events_for_unknown_radios_are_rejected() {
        let json = r#"{
            "radios": [ { "radio-id": 1, "initial-mode": "off" } ],
            "events": [ { "at-ms": 0, "radio-id": 9, "change": { "kind": "mode", "value": "sleep" } } ]
        }"#;
        assert!(matches!(Scenario::parse(json), Err(ScenarioLoadError::ValidationError(_))));
    }

    #[test]
    fn decreasing_timestamps_are_rejected() {
        let json = r#"{
            "radios": [ { "radio-id": 1, "initial-mode": "off" } ],
            "events": [
                { "at-ms": 10, "radio-id": 1, "change": { "kind": "mode", "value": "sleep" } },
                { "at-ms": 9, "radio-id": 1, "change": { "kind": "mode", "value": "off" } }
            ]
        }"#;
        assert!(matches!(Scenario::parse(json), Err(ScenarioLoadError::ValidationError(_))));
    }

    fn scenario_with_radio_count(count: usize) -> String {
        let radios: Vec<String> = (0..count)
            .map(|id| format!(r#"{{ "radio-id": {}, "initial-mode": "off" }}"#, id))
            .collect();
        format!(r#"{{ "radios": [{}], "events": [] }}"#, radios.join(","))
    }

    #[test]
    fn radio_count_is_capped_at_the_monitor_pool_size() {
        // One radio over the pool would leave monitors unspawned and their
        // summaries never produced, so validation must reject it up front.
        let over = scenario_with_radio_count(MAX_RADIO_COUNT + 1);
        assert!(matches!(Scenario::parse(&over), Err(ScenarioLoadError::ValidationError(_))));

        let full = scenario_with_radio_count(MAX_RADIO_COUNT);
        assert!(Scenario::parse(&full).is_ok());
    }

    #[test]
    fn empty_radio_list_is_rejected() {
        let json = r#"{ "radios": [], "events": [] }"#;
        assert!(matches!(Scenario::parse(json), Err(ScenarioLoadError::ValidationError(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Scenario::parse("{"), Err(ScenarioLoadError::ParseError(_))));
    }
}
