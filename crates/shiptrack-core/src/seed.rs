//! Seed fleet - the fixed set of vessels loaded at start
//!
//! Schedules are stored as minute offsets from the moment the fleet is
//! seeded, so the demo always opens with vessels mid-voyage.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use shiptrack_logic::{GeoPoint, Port};

use crate::components::{Vessel, VesselId, VesselKind, VesselStatus};
use crate::error::SeedError;

/// Seed fleet shipped with the tracker (same JSON the harness validates)
pub const FLEET_JSON: &str = include_str!("../../../data/fleet.json");

/// One vessel in the seed file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedVessel {
    pub id: VesselId,
    pub name: String,
    pub kind: VesselKind,
    pub status: VesselStatus,
    pub origin: Port,
    pub destination: Port,
    #[serde(default)]
    pub departure_offset_minutes: Option<i64>,
    #[serde(default)]
    pub arrival_offset_minutes: Option<i64>,
    pub position: GeoPoint,
    pub speed_knots: f64,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub progress: f64,
}

impl SeedVessel {
    /// Anchor the relative schedule at `now`.
    ///
    /// Fails when an offset lands outside the calendar range.
    pub fn at(self, now: DateTime<Utc>) -> Result<Vessel, SeedError> {
        let departure = offset_from(now, self.departure_offset_minutes, &self.id)?;
        let estimated_arrival = offset_from(now, self.arrival_offset_minutes, &self.id)?;
        Ok(Vessel {
            id: self.id,
            name: self.name,
            kind: self.kind,
            status: self.status,
            origin: self.origin,
            destination: self.destination,
            departure,
            estimated_arrival,
            position: self.position,
            speed_knots: self.speed_knots,
            cargo: self.cargo,
            capacity: self.capacity,
            progress: self.progress,
        })
    }
}

fn offset_from(now: DateTime<Utc>, minutes: Option<i64>, id: &VesselId) -> Result<Option<DateTime<Utc>>, SeedError> {
    let Some(minutes) = minutes else {
        return Ok(None);
    };
    Duration::try_minutes(minutes)
        .and_then(|d| now.checked_add_signed(d))
        .map(Some)
        .ok_or_else(|| SeedError::OffsetOutOfRange { id: id.clone() })
}

/// Parse a seed file without anchoring it.
pub fn parse_seed(json: &str) -> Result<Vec<SeedVessel>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Build a fleet from seed JSON, anchored at `now`.
pub fn fleet_from_json(json: &str, now: DateTime<Utc>) -> Result<Vec<Vessel>, SeedError> {
    parse_seed(json)?.into_iter().map(|s| s.at(now)).collect()
}

/// The built-in demo fleet, anchored at `now`.
pub fn mock_fleet(now: DateTime<Utc>) -> Result<Vec<Vessel>, SeedError> {
    fleet_from_json(FLEET_JSON, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_mock_fleet_shape() {
        let fleet = mock_fleet(t0()).unwrap();
        assert_eq!(fleet.len(), 5);

        let names: Vec<_> = fleet.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Caribbean Star", "Island Express", "Bonaire Queen", "Trade Wind", "Sea Hawk"]
        );

        for v in &fleet {
            assert_ne!(v.origin, v.destination, "{} sails nowhere", v.name);
            assert!(v.speed_knots >= 0.0);
            assert!((0.0..=100.0).contains(&v.progress));
            let (d, a) = (v.departure.unwrap(), v.estimated_arrival.unwrap());
            assert!(a > d, "{} arrives before it departs", v.name);
        }
    }

    #[test]
    fn test_offsets_anchor_at_now() {
        let fleet = mock_fleet(t0()).unwrap();
        let star = &fleet[0];
        assert_eq!(star.departure, Some(t0() - Duration::hours(2)));
        assert_eq!(star.estimated_arrival, Some(t0() + Duration::hours(1)));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"[{
            "id": "x", "name": "Dinghy", "kind": "passenger", "status": "docked",
            "origin": "Bonaire", "destination": "Curacao",
            "position": { "lat": 12.15, "lng": -68.27 }, "speed_knots": 0.0
        }]"#;
        let fleet = fleet_from_json(json, t0()).unwrap();
        assert!(fleet[0].departure.is_none());
        assert!(fleet[0].cargo.is_none());
        assert_eq!(fleet[0].progress, 0.0);
    }

    #[test]
    fn test_rejects_unknown_port() {
        let json = r#"[{
            "id": "x", "name": "Lost", "kind": "cargo", "status": "docked",
            "origin": "Aruba", "destination": "Curacao",
            "position": { "lat": 0.0, "lng": 0.0 }, "speed_knots": 0.0
        }]"#;
        assert!(matches!(fleet_from_json(json, t0()), Err(SeedError::Json(_))));
    }

    #[test]
    fn test_rejects_out_of_range_offsets() {
        let json = r#"[{
            "id": "far", "name": "Voyager", "kind": "cargo", "status": "at-sea",
            "origin": "Curacao", "destination": "Bonaire",
            "departure_offset_minutes": 0,
            "arrival_offset_minutes": 9223372036854775807,
            "position": { "lat": 0.0, "lng": 0.0 }, "speed_knots": 0.0
        }]"#;
        match fleet_from_json(json, t0()) {
            Err(SeedError::OffsetOutOfRange { id }) => assert_eq!(id, VesselId::from("far")),
            other => panic!("expected OffsetOutOfRange, got {:?}", other),
        }

        // Fits in a TimeDelta but not in the calendar
        let json = json.replace("9223372036854775807", "-500000000000");
        assert!(matches!(
            fleet_from_json(&json, t0()),
            Err(SeedError::OffsetOutOfRange { .. })
        ));
    }
}
