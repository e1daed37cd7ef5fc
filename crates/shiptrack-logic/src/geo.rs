//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;

/// Latitude/longitude in decimal degrees. Ranges are not validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle distance between two points, in kilometres.
pub fn compute_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    a.distance_km(&b)
}

/// Four-float form of [`compute_distance`].
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
