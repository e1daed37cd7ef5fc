//! Simulation configuration.
//!
//! Every field has a default matching the stock demo, so a config file only
//! needs the values it changes:
//!
//! ```json
//! { "time_scale": 60.0, "seed": 42 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use shiptrack_logic::constants::cadence;

use crate::components::VesselId;
use crate::error::ConfigError;
use crate::notifications::{NewNotification, NotificationKind};

/// A notification raised once, a fixed time after the simulation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedNotice {
    /// Simulated seconds after `start()`
    pub after_secs: f64,
    pub vessel_id: VesselId,
    pub kind: NotificationKind,
    pub message: String,
}

impl ScriptedNotice {
    pub fn to_notification(&self) -> NewNotification {
        NewNotification::new(self.vessel_id.clone(), self.kind, self.message.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// How often at-sea progress is recomputed, in simulated seconds
    pub progress_interval_secs: f64,
    /// Simulated seconds per real second (0 pauses the clock)
    pub time_scale: f64,
    /// Seed for notification ids; `None` draws from entropy
    pub seed: Option<u64>,
    pub scripted_notices: Vec<ScriptedNotice>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            progress_interval_secs: cadence::PROGRESS_REFRESH_SECS,
            time_scale: 1.0,
            seed: None,
            scripted_notices: vec![
                ScriptedNotice {
                    after_secs: cadence::ARRIVAL_NOTICE_SECS,
                    vessel_id: VesselId::from("3"),
                    kind: NotificationKind::Arrival,
                    message: "Bonaire Queen is arriving at Curacao port in 15 minutes".into(),
                },
                ScriptedNotice {
                    after_secs: cadence::DEPARTURE_NOTICE_SECS,
                    vessel_id: VesselId::from("2"),
                    kind: NotificationKind::Departure,
                    message: "Island Express is departing from Curacao in 30 minutes".into(),
                },
            ],
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.progress_interval_secs > 0.0) || !self.progress_interval_secs.is_finite() {
            return Err(ConfigError::Invalid {
                field: "progress_interval_secs",
                message: format!("must be a positive number of seconds, got {}", self.progress_interval_secs),
            });
        }
        if !(self.time_scale >= 0.0) || !self.time_scale.is_finite() {
            return Err(ConfigError::Invalid {
                field: "time_scale",
                message: format!("must be non-negative, got {}", self.time_scale),
            });
        }
        for notice in &self.scripted_notices {
            if !(notice.after_secs >= 0.0) || !notice.after_secs.is_finite() {
                return Err(ConfigError::Invalid {
                    field: "scripted_notices.after_secs",
                    message: format!("must be non-negative, got {} for vessel {}", notice.after_secs, notice.vessel_id),
                });
            }
            if notice.message.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "scripted_notices.message",
                    message: format!("empty message for vessel {}", notice.vessel_id),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.progress_interval_secs, 10.0);
        assert_eq!(config.scripted_notices.len(), 2);
        assert_eq!(config.scripted_notices[0].after_secs, 5.0);
        assert_eq!(config.scripted_notices[1].after_secs, 15.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "time_scale": 60.0, "seed": 42 }"#).unwrap();
        assert_eq!(config.time_scale, 60.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.progress_interval_secs, 10.0);
        assert_eq!(config.scripted_notices, SimulationConfig::default().scripted_notices);
    }

    #[test]
    fn test_custom_notices() {
        let json = r#"{
            "scripted_notices": [
                { "after_secs": 0, "vessel_id": "5", "kind": "delay", "message": "Sea Hawk delayed" }
            ]
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.scripted_notices.len(), 1);
        assert_eq!(config.scripted_notices[0].kind, NotificationKind::Delay);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SimulationConfig::from_json_str(r#"{ "progress_interval_secs": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "progress_interval_secs", .. }));

        let err = SimulationConfig::from_json_str(r#"{ "time_scale": -2 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "time_scale", .. }));

        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
