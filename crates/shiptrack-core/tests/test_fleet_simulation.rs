//! Integration tests for a full tracker session.
//!
//! Exercises: seed fleet → engine start → timed refreshes and notices
//! → dashboard operations (filter, select, notify me, read, clear) → stop.

use chrono::{DateTime, Duration, TimeZone, Utc};
use shiptrack_core::prelude::*;
use shiptrack_logic::Port;

// ── Helpers ────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn engine() -> SimulationEngine {
    let config = SimulationConfig {
        seed: Some(7),
        ..Default::default()
    };
    SimulationEngine::new(config, t0()).unwrap()
}

/// Drive the engine in one-second frames.
fn run_for(engine: &mut SimulationEngine, seconds: u32) {
    for _ in 0..seconds {
        engine.update(1.0);
    }
}

// ── Session tests ──────────────────────────────────────────────────────

#[test]
fn demo_timeline_first_twenty_seconds() {
    let mut engine = engine();
    engine.start().unwrap();

    run_for(&mut engine, 20);

    let kinds: Vec<_> = engine.store().notifications().iter().map(|n| n.kind).collect();
    // Newest first
    assert_eq!(kinds, vec![NotificationKind::Departure, NotificationKind::Arrival]);
    assert_eq!(engine.store().unread_count(), 2);
    assert_eq!(engine.now(), t0() + Duration::seconds(20));
}

#[test]
fn progress_stays_in_range_for_whole_day() {
    let mut engine = engine();
    engine.set_time_scale(60.0);
    engine.start().unwrap();

    for _ in 0..(24 * 60) {
        engine.update(1.0);
        for v in engine.store().vessels() {
            assert!(
                (0.0..=100.0).contains(&v.progress),
                "{} progress {}",
                v.name,
                v.progress
            );
        }
    }

    // Both at-sea vessels are long past their ETA
    for v in engine.store().vessels().into_iter().filter(Vessel::is_at_sea) {
        assert_eq!(v.progress, 100.0, "{}", v.name);
    }
}

#[test]
fn non_at_sea_progress_is_left_alone() {
    let mut engine = engine();
    engine.start().unwrap();
    run_for(&mut engine, 600);

    let queen = engine.store().vessel(&VesselId::from("3")).unwrap();
    assert_eq!(queen.status, VesselStatus::Arriving);
    assert_eq!(queen.progress, 92.0);
}

#[test]
fn dashboard_filter_and_selection() {
    let mut engine = engine();
    let store = engine.store_mut();

    store.set_filter(FilterUpdate {
        destination: Some(Some(Port::Curacao)),
        ..Default::default()
    });
    let names: Vec<_> = store.filtered_vessels().into_iter().map(|v| v.name).collect();
    assert_eq!(names, vec!["Bonaire Queen", "Trade Wind", "Sea Hawk"]);

    store.set_filter(FilterUpdate {
        status: Some(Some(VesselStatus::AtSea)),
        ..Default::default()
    });
    let names: Vec<_> = store.filtered_vessels().into_iter().map(|v| v.name).collect();
    assert_eq!(names, vec!["Sea Hawk"]);

    store.set_filter(FilterUpdate {
        status: Some(Some(VesselStatus::Docked)),
        destination: Some(Some(Port::Bonaire)),
    });
    assert!(store.filtered_vessels().is_empty());

    let hawk = VesselId::from("5");
    store.select_vessel(Some(&hawk)).unwrap();
    let selected = store.selected().unwrap();
    let d = selected.distance_to_destination_km();
    assert!(d > 50.0 && d < 57.0, "got {} km", d);
}

#[test]
fn notify_me_then_read_and_clear() {
    let mut engine = engine();
    engine.start().unwrap();

    let hawk = VesselId::from("5");
    let ack = engine.request_arrival_notice(&hawk).unwrap();
    assert!(engine.store_mut().mark_notification_read(&ack));

    // Sea Hawk is due two hours after start
    run_for(&mut engine, 2 * 3600);

    let store = engine.store();
    let arrival = store
        .notifications()
        .for_vessel(&hawk)
        .find(|n| n.kind == NotificationKind::Arrival)
        .expect("arrival notice");
    assert_eq!(arrival.message, "Sea Hawk has arrived at Curacao");
    assert!(!arrival.read);
    assert_eq!(arrival.timestamp, t0() + Duration::hours(2));

    // Scripted arrival + departure + Sea Hawk arrival
    assert_eq!(store.unread_count(), 3);

    engine.store_mut().mark_all_notifications_read();
    assert_eq!(engine.store().unread_count(), 0);
    engine.store_mut().clear_notifications();
    assert!(engine.store().notifications().is_empty());
}

#[test]
fn stop_halts_progress_and_notices() {
    let mut engine = engine();
    engine.start().unwrap();
    run_for(&mut engine, 3);
    engine.stop();

    run_for(&mut engine, 3600);
    assert!(engine.store().notifications().is_empty());
    assert_eq!(engine.now(), t0() + Duration::seconds(3));

    // A fresh start reschedules from the current clock
    engine.start().unwrap();
    run_for(&mut engine, 5);
    assert_eq!(engine.store().notifications().len(), 1);
}

#[test]
fn custom_fleet_with_malformed_schedule() {
    let config = SimulationConfig {
        seed: Some(1),
        scripted_notices: Vec::new(),
        ..Default::default()
    };
    let fleet = vec![Vessel {
        id: VesselId::from("bad"),
        name: "Backwards".into(),
        kind: VesselKind::Tanker,
        status: VesselStatus::AtSea,
        origin: Port::Curacao,
        destination: Port::Bonaire,
        departure: Some(t0()),
        estimated_arrival: Some(t0() - Duration::hours(1)),
        position: Port::Curacao.coords(),
        speed_knots: 9.0,
        cargo: None,
        capacity: None,
        progress: 0.0,
    }];
    let mut engine = SimulationEngine::with_fleet(config, t0(), fleet).unwrap();
    engine.start().unwrap();
    run_for(&mut engine, 10);

    let v = engine.store().vessel(&VesselId::from("bad")).unwrap();
    assert_eq!(v.progress, 100.0);
}
