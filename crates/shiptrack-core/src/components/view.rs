//! Flat vessel record and partial updates.
//!
//! The store keeps a vessel as separate components; [`Vessel`] is the
//! assembled snapshot handed to callers, and [`VesselUpdate`] is the
//! field-by-field patch accepted by `FleetStore::update_vessel`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiptrack_logic::progress::clamp_progress;
use shiptrack_logic::{GeoPoint, Port};

use super::vessel::*;

/// Full snapshot of one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    pub kind: VesselKind,
    pub status: VesselStatus,
    pub origin: Port,
    pub destination: Port,
    pub departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub position: GeoPoint,
    pub speed_knots: f64,
    pub cargo: Option<String>,
    pub capacity: Option<String>,
    pub progress: f64,
}

impl Vessel {
    /// Split into the component bundle spawned into the world.
    /// Progress and speed are clamped on the way in.
    pub fn into_components(self) -> (Identity, Route, Schedule, Navigation, Manifest, Voyage) {
        (
            Identity {
                id: self.id,
                name: self.name,
                kind: self.kind,
            },
            Route {
                origin: self.origin,
                destination: self.destination,
            },
            Schedule {
                departure: self.departure,
                estimated_arrival: self.estimated_arrival,
            },
            Navigation {
                position: self.position,
                speed_knots: clamp_speed(self.speed_knots),
            },
            Manifest {
                cargo: self.cargo,
                capacity: self.capacity,
            },
            Voyage {
                status: self.status,
                progress: clamp_progress(self.progress),
            },
        )
    }

    pub fn from_components(
        identity: &Identity,
        route: &Route,
        schedule: &Schedule,
        nav: &Navigation,
        manifest: &Manifest,
        voyage: &Voyage,
    ) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            kind: identity.kind,
            status: voyage.status,
            origin: route.origin,
            destination: route.destination,
            departure: schedule.departure,
            estimated_arrival: schedule.estimated_arrival,
            position: nav.position,
            speed_knots: nav.speed_knots,
            cargo: manifest.cargo.clone(),
            capacity: manifest.capacity.clone(),
            progress: voyage.progress,
        }
    }

    /// Great-circle distance from the current position to the destination port.
    pub fn distance_to_destination_km(&self) -> f64 {
        self.position.distance_km(&self.destination.coords())
    }

    pub fn is_at_sea(&self) -> bool {
        self.status == VesselStatus::AtSea
    }
}

/// Negative or NaN speeds are recorded as stationary.
pub fn clamp_speed(knots: f64) -> f64 {
    if knots.is_nan() {
        0.0
    } else {
        knots.max(0.0)
    }
}

/// Partial vessel update. `None` leaves the field untouched.
///
/// Optional vessel fields use a nested `Option`: `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselUpdate {
    pub name: Option<String>,
    pub kind: Option<VesselKind>,
    pub status: Option<VesselStatus>,
    pub origin: Option<Port>,
    pub destination: Option<Port>,
    pub departure: Option<Option<DateTime<Utc>>>,
    pub estimated_arrival: Option<Option<DateTime<Utc>>>,
    pub position: Option<GeoPoint>,
    pub speed_knots: Option<f64>,
    pub cargo: Option<Option<String>>,
    pub capacity: Option<Option<String>>,
    pub progress: Option<f64>,
}

impl VesselUpdate {
    pub fn status(status: VesselStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn progress(progress: f64) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vessel {
        Vessel {
            id: VesselId::from("7"),
            name: "Harbour Light".into(),
            kind: VesselKind::Container,
            status: VesselStatus::AtSea,
            origin: Port::Bonaire,
            destination: Port::Curacao,
            departure: None,
            estimated_arrival: None,
            position: Port::Bonaire.coords(),
            speed_knots: -4.0,
            cargo: Some("Reefers".into()),
            capacity: None,
            progress: 180.0,
        }
    }

    #[test]
    fn test_components_roundtrip_clamps() {
        let (identity, route, schedule, nav, manifest, voyage) = sample().into_components();
        assert_eq!(nav.speed_knots, 0.0);
        assert_eq!(voyage.progress, 100.0);

        let back = Vessel::from_components(&identity, &route, &schedule, &nav, &manifest, &voyage);
        assert_eq!(back.id, VesselId::from("7"));
        assert_eq!(back.cargo.as_deref(), Some("Reefers"));
    }

    #[test]
    fn test_distance_to_destination() {
        let v = sample();
        let d = v.distance_to_destination_km();
        assert!(d > 79.0 && d < 79.3);
    }

    #[test]
    fn test_update_builders() {
        assert!(VesselUpdate::default().is_empty());
        assert!(!VesselUpdate::status(VesselStatus::Docked).is_empty());
        assert_eq!(VesselUpdate::progress(12.0).progress, Some(12.0));
    }
}
