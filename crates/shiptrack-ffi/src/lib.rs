//! C FFI bindings for the ShipTrack voyage math and simulation engine
//!
//! Exposes the two pure calculations directly, plus an opaque engine handle
//! for hosts that want to drive the whole fleet simulation from C.
//!
//! # Basic Usage (C)
//! ```c
//! #include "shiptrack.h"
//!
//! double pct = shiptrack_compute_progress(dep_ms, eta_ms, now_ms);
//! double km = shiptrack_compute_distance(12.1696, -68.99, 12.2019, -68.2624);
//!
//! ShipTrackHandle sim = shiptrack_create(42);
//! shiptrack_start(sim);
//!
//! // Host loop
//! while (running) {
//!     shiptrack_update(sim, delta_time);
//!
//!     uint32_t count = shiptrack_vessel_count(sim);
//!     for (uint32_t i = 0; i < count; i++) {
//!         ShipTrackVessel vessel;
//!         if (shiptrack_get_vessel(sim, i, &vessel)) {
//!             // Use vessel.lat, vessel.lng, vessel.progress, etc.
//!         }
//!     }
//! }
//!
//! shiptrack_destroy(sim);
//! ```

use chrono::Utc;
use shiptrack_core::components::{Vessel, VesselKind, VesselStatus};
use shiptrack_core::config::SimulationConfig;
use shiptrack_core::engine::SimulationEngine;
use shiptrack_logic::display::TimeRemaining;
use shiptrack_logic::geo::haversine_km;
use shiptrack_logic::progress::compute_progress_f64;
use shiptrack_logic::Port;

/// Opaque handle to the simulation engine
pub type ShipTrackHandle = *mut SimulationEngine;

/// Vessel data returned to C
#[repr(C)]
pub struct ShipTrackVessel {
    /// Index of this vessel (0 to vessel_count-1)
    pub index: u32,
    pub lat: f64,
    pub lng: f64,
    pub speed_knots: f64,
    /// Journey progress, 0-100
    pub progress: f64,
    /// Great-circle distance to the destination port in km
    pub distance_km: f64,
    /// Minutes until ETA, or -1 when the vessel has no ETA
    pub eta_minutes: i64,
    /// 0 docked, 1 departing, 2 at sea, 3 arriving
    pub status: u8,
    /// 0 cargo, 1 container, 2 tanker, 3 passenger
    pub kind: u8,
    /// 0 Curacao, 1 Bonaire
    pub origin: u8,
    /// 0 Curacao, 1 Bonaire
    pub destination: u8,
}

// ============================================================================
// Voyage Math
// ============================================================================

/// Journey progress in percent for epoch-millisecond timestamps.
///
/// Always returns a value in [0, 100]; NaN inputs yield 0.
#[no_mangle]
pub extern "C" fn shiptrack_compute_progress(departure_ms: f64, arrival_ms: f64, now_ms: f64) -> f64 {
    compute_progress_f64(departure_ms, arrival_ms, now_ms)
}

/// Great-circle distance in km between two points given in degrees.
#[no_mangle]
pub extern "C" fn shiptrack_compute_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_km(lat1, lng1, lat2, lng2)
}

// ============================================================================
// Lifecycle Functions
// ============================================================================

/// Create an engine with the demo fleet, anchored at the current time.
///
/// `seed` fixes notification ids; pass 0 to seed from entropy.
/// Returns a handle that must be freed with `shiptrack_destroy`, or null if
/// the engine could not be built.
#[no_mangle]
pub extern "C" fn shiptrack_create(seed: u64) -> ShipTrackHandle {
    let config = SimulationConfig {
        seed: (seed != 0).then_some(seed),
        ..Default::default()
    };
    match SimulationEngine::new(config, Utc::now()) {
        Ok(engine) => Box::into_raw(Box::new(engine)),
        Err(e) => {
            log::error!("shiptrack_create failed: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Destroy a simulation engine and free its memory
#[no_mangle]
pub extern "C" fn shiptrack_destroy(handle: ShipTrackHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

// ============================================================================
// Simulation Control
// ============================================================================

/// Start the progress refresh and scripted notices. Returns false on error.
#[no_mangle]
pub extern "C" fn shiptrack_start(handle: ShipTrackHandle) -> bool {
    if handle.is_null() {
        return false;
    }

    let sim = unsafe { &mut *handle };
    match sim.start() {
        Ok(()) => true,
        Err(e) => {
            log::error!("shiptrack_start failed: {}", e);
            false
        }
    }
}

/// Cancel all scheduled work. Safe to call repeatedly.
#[no_mangle]
pub extern "C" fn shiptrack_stop(handle: ShipTrackHandle) {
    if handle.is_null() {
        return;
    }

    let sim = unsafe { &mut *handle };
    sim.stop();
}

/// Update the simulation by delta_seconds (in real time)
///
/// The simulated time advanced depends on the time scale.
#[no_mangle]
pub extern "C" fn shiptrack_update(handle: ShipTrackHandle, delta_seconds: f64) {
    if handle.is_null() {
        return;
    }

    let sim = unsafe { &mut *handle };
    sim.update(delta_seconds);
}

/// Set the time scale (1.0 = real-time, 60.0 = a minute per second)
#[no_mangle]
pub extern "C" fn shiptrack_set_time_scale(handle: ShipTrackHandle, scale: f64) {
    if handle.is_null() {
        return;
    }

    let sim = unsafe { &mut *handle };
    sim.set_time_scale(scale);
}

#[no_mangle]
pub extern "C" fn shiptrack_get_time_scale(handle: ShipTrackHandle) -> f64 {
    if handle.is_null() {
        return 0.0;
    }

    let sim = unsafe { &*handle };
    sim.time_scale()
}

// ============================================================================
// Query Functions
// ============================================================================

#[no_mangle]
pub extern "C" fn shiptrack_vessel_count(handle: ShipTrackHandle) -> u32 {
    if handle.is_null() {
        return 0;
    }

    let sim = unsafe { &*handle };
    sim.store().vessel_count() as u32
}

/// Get vessel data by index
///
/// Returns true if successful, false if index out of bounds
#[no_mangle]
pub extern "C" fn shiptrack_get_vessel(
    handle: ShipTrackHandle,
    index: u32,
    vessel: *mut ShipTrackVessel,
) -> bool {
    if handle.is_null() || vessel.is_null() {
        return false;
    }

    let sim = unsafe { &*handle };
    let snapshot = match sim.store().vessels().into_iter().nth(index as usize) {
        Some(v) => v,
        None => return false,
    };

    let out = unsafe { &mut *vessel };
    *out = to_c_vessel(index, &snapshot, sim.now().timestamp_millis());
    true
}

/// Ask for an arrival notice for the vessel at `index`.
///
/// Returns false if the index is out of bounds.
#[no_mangle]
pub extern "C" fn shiptrack_request_arrival_notice(handle: ShipTrackHandle, index: u32) -> bool {
    if handle.is_null() {
        return false;
    }

    let sim = unsafe { &mut *handle };
    let id = match sim.store().vessels().into_iter().nth(index as usize) {
        Some(v) => v.id,
        None => return false,
    };
    sim.request_arrival_notice(&id).is_ok()
}

#[no_mangle]
pub extern "C" fn shiptrack_notification_count(handle: ShipTrackHandle) -> u32 {
    if handle.is_null() {
        return 0;
    }

    let sim = unsafe { &*handle };
    sim.store().notifications().len() as u32
}

#[no_mangle]
pub extern "C" fn shiptrack_unread_count(handle: ShipTrackHandle) -> u32 {
    if handle.is_null() {
        return 0;
    }

    let sim = unsafe { &*handle };
    sim.store().unread_count() as u32
}

#[no_mangle]
pub extern "C" fn shiptrack_mark_all_read(handle: ShipTrackHandle) {
    if handle.is_null() {
        return;
    }

    let sim = unsafe { &mut *handle };
    sim.store_mut().mark_all_notifications_read();
}

#[no_mangle]
pub extern "C" fn shiptrack_clear_notifications(handle: ShipTrackHandle) {
    if handle.is_null() {
        return;
    }

    let sim = unsafe { &mut *handle };
    sim.store_mut().clear_notifications();
}

// ============================================================================
// Helper Functions
// ============================================================================

fn to_c_vessel(index: u32, v: &Vessel, now_ms: i64) -> ShipTrackVessel {
    let eta_minutes = match v.estimated_arrival {
        Some(eta) => {
            let left = TimeRemaining::until(eta.timestamp_millis(), now_ms);
            left.hours * 60 + left.minutes
        }
        None => -1,
    };

    ShipTrackVessel {
        index,
        lat: v.position.lat,
        lng: v.position.lng,
        speed_knots: v.speed_knots,
        progress: v.progress,
        distance_km: v.distance_to_destination_km(),
        eta_minutes,
        status: status_code(v.status),
        kind: kind_code(v.kind),
        origin: port_code(v.origin),
        destination: port_code(v.destination),
    }
}

fn status_code(status: VesselStatus) -> u8 {
    match status {
        VesselStatus::Docked => 0,
        VesselStatus::Departing => 1,
        VesselStatus::AtSea => 2,
        VesselStatus::Arriving => 3,
    }
}

fn kind_code(kind: VesselKind) -> u8 {
    match kind {
        VesselKind::Cargo => 0,
        VesselKind::Container => 1,
        VesselKind::Tanker => 2,
        VesselKind::Passenger => 3,
    }
}

fn port_code(port: Port) -> u8 {
    match port {
        Port::Curacao => 0,
        Port::Bonaire => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_vessel() -> ShipTrackVessel {
        ShipTrackVessel {
            index: 0,
            lat: 0.0,
            lng: 0.0,
            speed_knots: 0.0,
            progress: 0.0,
            distance_km: 0.0,
            eta_minutes: 0,
            status: 0,
            kind: 0,
            origin: 0,
            destination: 0,
        }
    }

    #[test]
    fn test_compute_progress() {
        assert_eq!(shiptrack_compute_progress(0.0, 7_200_000.0, 3_600_000.0), 50.0);
        assert_eq!(shiptrack_compute_progress(0.0, 100.0, -5.0), 0.0);
        assert_eq!(shiptrack_compute_progress(0.0, 100.0, 500.0), 100.0);
        assert_eq!(shiptrack_compute_progress(f64::NAN, 100.0, 50.0), 0.0);
    }

    #[test]
    fn test_compute_distance() {
        let d = shiptrack_compute_distance(12.1696, -68.99, 12.2019, -68.2624);
        assert!((d - 79.16).abs() < 0.05, "got {}", d);
        assert_eq!(shiptrack_compute_distance(12.0, -68.0, 12.0, -68.0), 0.0);
    }

    #[test]
    fn test_null_handle_is_harmless() {
        let null = std::ptr::null_mut();
        assert!(!shiptrack_start(null));
        shiptrack_update(null, 1.0);
        shiptrack_stop(null);
        shiptrack_mark_all_read(null);
        shiptrack_clear_notifications(null);
        assert_eq!(shiptrack_vessel_count(null), 0);
        assert_eq!(shiptrack_notification_count(null), 0);
        let mut v = empty_vessel();
        assert!(!shiptrack_get_vessel(null, 0, &mut v));
        shiptrack_destroy(null);
    }

    #[test]
    fn test_engine_lifecycle() {
        let sim = shiptrack_create(42);
        assert!(!sim.is_null());
        assert!(shiptrack_start(sim));
        assert_eq!(shiptrack_vessel_count(sim), 5);

        let mut v = empty_vessel();
        assert!(shiptrack_get_vessel(sim, 0, &mut v));
        assert_eq!(v.status, 2);
        assert_eq!(v.destination, 1);
        assert_eq!(v.eta_minutes, 60);
        assert!(v.distance_km > 0.0);
        assert!(!shiptrack_get_vessel(sim, 5, &mut v));

        for _ in 0..20 {
            shiptrack_update(sim, 1.0);
        }
        assert_eq!(shiptrack_notification_count(sim), 2);
        assert_eq!(shiptrack_unread_count(sim), 2);

        assert!(shiptrack_request_arrival_notice(sim, 4));
        assert!(!shiptrack_request_arrival_notice(sim, 9));
        assert_eq!(shiptrack_notification_count(sim), 3);

        shiptrack_mark_all_read(sim);
        assert_eq!(shiptrack_unread_count(sim), 0);
        shiptrack_clear_notifications(sim);
        assert_eq!(shiptrack_notification_count(sim), 0);

        shiptrack_stop(sim);
        shiptrack_set_time_scale(sim, 60.0);
        assert_eq!(shiptrack_get_time_scale(sim), 60.0);
        shiptrack_update(sim, 100.0);
        assert_eq!(shiptrack_notification_count(sim), 0);

        shiptrack_destroy(sim);
    }

    #[test]
    fn test_huge_delta_does_not_unwind() {
        let sim = shiptrack_create(7);
        assert!(shiptrack_start(sim));

        shiptrack_update(sim, 1e13);
        shiptrack_update(sim, f64::MAX);
        assert_eq!(shiptrack_notification_count(sim), 0);

        // Frame-sized steps still drive the scripted notices
        for _ in 0..(6 * 60) {
            shiptrack_update(sim, 1.0 / 60.0);
        }
        assert_eq!(shiptrack_notification_count(sim), 1);

        shiptrack_destroy(sim);
    }
}
