//! Per-vessel components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiptrack_logic::{GeoPoint, Port};

/// Opaque vessel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselId(pub String);

impl VesselId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VesselId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for VesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vessel category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VesselKind {
    Cargo,
    Container,
    Tanker,
    Passenger,
}

impl VesselKind {
    pub fn label(&self) -> &'static str {
        match self {
            VesselKind::Cargo => "cargo",
            VesselKind::Container => "container",
            VesselKind::Tanker => "tanker",
            VesselKind::Passenger => "passenger",
        }
    }
}

/// Lifecycle phase of a vessel on its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VesselStatus {
    Docked,
    Departing,
    AtSea,
    Arriving,
}

impl VesselStatus {
    pub const ALL: [VesselStatus; 4] = [
        VesselStatus::Docked,
        VesselStatus::Departing,
        VesselStatus::AtSea,
        VesselStatus::Arriving,
    ];

    /// Badge text, e.g. "AT SEA".
    pub fn label(&self) -> &'static str {
        match self {
            VesselStatus::Docked => "DOCKED",
            VesselStatus::Departing => "DEPARTING",
            VesselStatus::AtSea => "AT SEA",
            VesselStatus::Arriving => "ARRIVING",
        }
    }

    /// Wire name, e.g. "at-sea".
    pub fn key(&self) -> &'static str {
        match self {
            VesselStatus::Docked => "docked",
            VesselStatus::Departing => "departing",
            VesselStatus::AtSea => "at-sea",
            VesselStatus::Arriving => "arriving",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

/// Name and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: VesselId,
    pub name: String,
    pub kind: VesselKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin: Port,
    pub destination: Port,
}

/// Departure and ETA. Either may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Both endpoints as epoch milliseconds, if both are known.
    pub fn window_ms(&self) -> Option<(i64, i64)> {
        match (self.departure, self.estimated_arrival) {
            (Some(d), Some(a)) => Some((d.timestamp_millis(), a.timestamp_millis())),
            _ => None,
        }
    }

    /// Progress at `now`, or `None` when the window is incomplete.
    pub fn progress_at(&self, now: DateTime<Utc>) -> Option<f64> {
        self.window_ms().map(|(departure, arrival)| {
            shiptrack_logic::compute_progress(departure, arrival, now.timestamp_millis())
        })
    }
}

/// Where the vessel is and how fast it is going.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    pub position: GeoPoint,
    /// Speed over ground in knots, never negative
    pub speed_knots: f64,
}

/// Free-text cargo and capacity descriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub cargo: Option<String>,
    pub capacity: Option<String>,
}

/// Current phase and journey completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voyage {
    pub status: VesselStatus,
    /// Percent complete in [0, 100]; only meaningful while at sea
    pub progress: f64,
}
