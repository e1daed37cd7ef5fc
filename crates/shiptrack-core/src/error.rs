use thiserror::Error;

use crate::components::VesselId;
use crate::scheduler::ScheduleError;

/// Errors from fleet store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FleetError {
    #[error("unknown vessel: {0}")]
    UnknownVessel(VesselId),

    #[error("duplicate vessel id: {0}")]
    DuplicateVessel(VesselId),

    #[error("vessel {0} has no estimated arrival")]
    NoEstimatedArrival(VesselId),
}

/// Errors loading the seed fleet.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("malformed seed fleet: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schedule offset out of range for vessel {id}")]
    OffsetOutOfRange { id: VesselId },
}

/// Errors loading or validating a simulation config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Errors starting or driving the simulation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FleetError::UnknownVessel(VesselId::from("42"));
        assert_eq!(err.to_string(), "unknown vessel: 42");

        let err = ConfigError::Invalid {
            field: "time_scale",
            message: "must be non-negative".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for time_scale: must be non-negative"
        );

        let err = EngineError::from(ScheduleError::NonPositivePeriod(0.0));
        assert_eq!(err.to_string(), "task period must be positive, got 0");
    }
}
