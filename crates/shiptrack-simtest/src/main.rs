//! ShipTrack Headless Simulation Harness
//!
//! Validates voyage math, the seed fleet, the scheduler and the engine
//! in-process, then optionally runs the demo and prints the fleet board.
//!
//! Usage:
//!   cargo run -p shiptrack-simtest
//!   cargo run -p shiptrack-simtest -- --verbose
//!   cargo run -p shiptrack-simtest -- --run 3600 --config sim.json

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Parser;
use shiptrack_core::engine::SimulationEngine;
use shiptrack_core::prelude::*;
use shiptrack_core::scheduler::Scheduler;
use shiptrack_core::seed::{self, FLEET_JSON};
use shiptrack_logic::display::{Age, TimeRemaining};
use shiptrack_logic::progress::{compute_progress_f64, is_complete};
use shiptrack_logic::{compute_distance, compute_progress, GeoPoint, Port};
use tracing_subscriber::EnvFilter;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Parser, Debug)]
#[command(name = "shiptrack-simtest")]
#[command(about = "Headless validation and demo run for the ShipTrack fleet engine", long_about = None)]
struct Args {
    /// Print every check and the intermediate tables
    #[arg(long)]
    verbose: bool,

    /// After validation, run the demo for this many real seconds
    #[arg(long, value_name = "SECS")]
    run: Option<u32>,

    /// Simulation config (JSON) for the demo run
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let verbose = args.verbose;

    println!("=== ShipTrack Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Progress percentage
    results.extend(validate_progress(verbose));

    // 2. Great-circle distance & ports
    results.extend(validate_distance(verbose));

    // 3. Display helpers
    results.extend(validate_display(verbose));

    // 4. Seed fleet
    results.extend(validate_seed_fleet(verbose));

    // 5. Scheduler
    results.extend(validate_scheduler(verbose));

    // 6. Engine timeline
    results.extend(validate_engine(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if let Some(secs) = args.run {
        if let Err(e) = run_demo(secs, args.config.as_deref()) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

// ── 1. Progress ─────────────────────────────────────────────────────────

fn validate_progress(verbose: bool) -> Vec<TestResult> {
    println!("--- Progress ---");
    let mut results = Vec::new();
    const HOUR: i64 = 3_600_000;

    let dep = 1_700_000_000_000;
    let arr = dep + 2 * HOUR;

    results.push(TestResult {
        name: "progress_endpoints".into(),
        passed: compute_progress(dep, arr, dep) == 0.0 && compute_progress(dep, arr, arr) == 100.0,
        detail: "0 at departure, 100 at arrival".into(),
    });

    results.push(TestResult {
        name: "progress_midpoint".into(),
        passed: (compute_progress(dep, arr, dep + HOUR) - 50.0).abs() < 1e-9,
        detail: "T+1h of a 2h trip = 50".into(),
    });

    results.push(TestResult {
        name: "progress_clamped".into(),
        passed: compute_progress(dep, arr, dep - HOUR) == 0.0
            && compute_progress(dep, arr, arr + 10 * HOUR) == 100.0,
        detail: "before departure → 0, after arrival → 100".into(),
    });

    // Sweep a malformed and a degenerate window plus extreme clocks
    let windows = [(dep, arr), (arr, dep), (dep, dep), (i64::MIN, i64::MAX)];
    let clocks = [i64::MIN, dep - HOUR, dep, dep + HOUR, arr, i64::MAX];
    let mut out_of_range = 0;
    for &(d, a) in &windows {
        for &now in &clocks {
            let p = compute_progress(d, a, now);
            if !(0.0..=100.0).contains(&p) {
                out_of_range += 1;
            }
        }
    }
    results.push(TestResult {
        name: "progress_always_in_range".into(),
        passed: out_of_range == 0,
        detail: format!(
            "{} combos, {} out of [0,100]",
            windows.len() * clocks.len(),
            out_of_range
        ),
    });

    let nan = compute_progress_f64(f64::NAN, 1.0, 0.5);
    let inf = compute_progress_f64(0.0, f64::INFINITY, f64::INFINITY);
    results.push(TestResult {
        name: "progress_non_finite".into(),
        passed: nan == 0.0 && (0.0..=100.0).contains(&inf),
        detail: format!("NaN → {}, inf window → {}", nan, inf),
    });

    // Monotone in time
    let mut last = -1.0;
    let mut monotone = true;
    for minute in 0..=180 {
        let p = compute_progress(dep, arr, dep - 30 * 60_000 + minute * 60_000);
        if p < last {
            monotone = false;
        }
        last = p;
    }
    results.push(TestResult {
        name: "progress_monotone".into(),
        passed: monotone,
        detail: "non-decreasing over a 3h sweep".into(),
    });

    if verbose {
        println!("  Progress over a 2h trip:");
        for quarter in 0..=4 {
            let now = dep + quarter * HOUR / 2;
            println!("    T+{:>3}m → {:5.1}%", quarter * 30, compute_progress(dep, arr, now));
        }
    }

    results
}

// ── 2. Distance ─────────────────────────────────────────────────────────

fn validate_distance(verbose: bool) -> Vec<TestResult> {
    println!("--- Distance ---");
    let mut results = Vec::new();

    let cur = Port::Curacao.coords();
    let bon = Port::Bonaire.coords();
    let d = compute_distance(cur, bon);
    results.push(TestResult {
        name: "distance_port_to_port".into(),
        passed: (d - 79.16).abs() < 0.05,
        detail: format!("Curacao → Bonaire = {:.2} km", d),
    });

    let back = compute_distance(bon, cur);
    results.push(TestResult {
        name: "distance_symmetric".into(),
        passed: (d - back).abs() < 1e-9,
        detail: format!("{:.6} vs {:.6}", d, back),
    });

    results.push(TestResult {
        name: "distance_identical_points".into(),
        passed: compute_distance(cur, cur) == 0.0,
        detail: "same point → 0 km".into(),
    });

    let mid = GeoPoint::new(12.18, -68.6);
    let detour = compute_distance(cur, mid) + compute_distance(mid, bon);
    results.push(TestResult {
        name: "distance_triangle".into(),
        passed: detour + 1e-9 >= d,
        detail: format!("via mid-channel {:.2} km ≥ {:.2} km", detour, d),
    });

    let roundtrip = Port::ALL.iter().all(|p| Port::from_name(p.name()) == Some(*p) && p.opposite() != *p);
    results.push(TestResult {
        name: "ports_lookup".into(),
        passed: roundtrip && Port::from_name(" bonaire ") == Some(Port::Bonaire),
        detail: "names resolve, each port has an opposite".into(),
    });

    if verbose {
        for port in Port::ALL {
            let c = port.coords();
            println!("  {:8} ({:.4}, {:.4})", port.name(), c.lat, c.lng);
        }
    }

    results
}

// ── 3. Display helpers ──────────────────────────────────────────────────

fn validate_display(_verbose: bool) -> Vec<TestResult> {
    println!("--- Display ---");
    let mut results = Vec::new();
    const MIN: i64 = 60_000;

    let left = TimeRemaining::until(105 * MIN + 30_000, 0);
    results.push(TestResult {
        name: "time_remaining_format".into(),
        passed: left.to_string() == "1h 45m",
        detail: format!("105.5 minutes → {}", left),
    });

    let overdue = TimeRemaining::until(0, 10 * MIN);
    results.push(TestResult {
        name: "time_remaining_overdue".into(),
        passed: overdue.is_zero(),
        detail: format!("past ETA → {}", overdue),
    });

    let labels: Vec<String> = [30_000, 5 * MIN, 3 * 60 * MIN, 2 * 24 * 60 * MIN]
        .iter()
        .map(|&ago| Age::since(0, ago).to_string())
        .collect();
    results.push(TestResult {
        name: "age_buckets".into(),
        passed: labels == ["Just now", "5m ago", "3h ago", "2d ago"],
        detail: labels.join(", "),
    });

    results
}

// ── 4. Seed fleet ───────────────────────────────────────────────────────

fn validate_seed_fleet(verbose: bool) -> Vec<TestResult> {
    println!("--- Seed Fleet ---");
    let mut results = Vec::new();

    let fleet = match seed::fleet_from_json(FLEET_JSON, t0()) {
        Ok(f) => f,
        Err(e) => {
            results.push(TestResult {
                name: "seed_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "seed_count".into(),
        passed: fleet.len() == 5,
        detail: format!("{} vessels loaded", fleet.len()),
    });

    let mut store = FleetStore::new();
    let loaded = store.set_vessels(fleet.clone());
    results.push(TestResult {
        name: "seed_unique_ids".into(),
        passed: loaded.is_ok(),
        detail: match &loaded {
            Ok(()) => "all ids unique".into(),
            Err(e) => e.to_string(),
        },
    });

    let bad_route: Vec<_> = fleet.iter().filter(|v| v.origin == v.destination).collect();
    results.push(TestResult {
        name: "seed_routes".into(),
        passed: bad_route.is_empty(),
        detail: format!("{} vessels with origin == destination", bad_route.len()),
    });

    let in_range = fleet
        .iter()
        .all(|v| (0.0..=100.0).contains(&v.progress) && v.speed_knots >= 0.0);
    results.push(TestResult {
        name: "seed_ranges".into(),
        passed: in_range,
        detail: "progress in [0,100], speed ≥ 0".into(),
    });

    let bad_window: Vec<_> = fleet
        .iter()
        .filter(|v| matches!((v.departure, v.estimated_arrival), (Some(d), Some(a)) if a <= d))
        .map(|v| v.name.as_str())
        .collect();
    results.push(TestResult {
        name: "seed_schedules".into(),
        passed: bad_window.is_empty(),
        detail: if bad_window.is_empty() {
            "every ETA follows its departure".into()
        } else {
            format!("ETA before departure: {}", bad_window.join(", "))
        },
    });

    let per_status: Vec<String> = VesselStatus::ALL
        .iter()
        .map(|s| format!("{}={}", s.key(), fleet.iter().filter(|v| v.status == *s).count()))
        .collect();
    results.push(TestResult {
        name: "seed_every_status".into(),
        passed: VesselStatus::ALL.iter().all(|s| fleet.iter().any(|v| v.status == *s)),
        detail: per_status.join(" "),
    });

    if verbose {
        print_board(&store, t0());
    }

    results
}

// ── 5. Scheduler ────────────────────────────────────────────────────────

fn validate_scheduler(_verbose: bool) -> Vec<TestResult> {
    println!("--- Scheduler ---");
    let mut results = Vec::new();

    let mut sched: Scheduler<&'static str> = Scheduler::new();
    let tick = sched.schedule_every(10.0, "tick");
    let once = sched.schedule_once(5.0, "once");
    results.push(TestResult {
        name: "scheduler_register".into(),
        passed: tick.is_ok() && once.is_ok() && sched.active_count() == 2,
        detail: format!("{} active tasks", sched.active_count()),
    });

    let fired: Vec<_> = sched
        .advance(35.0)
        .into_iter()
        .map(|d| (d.action, d.count))
        .collect();
    results.push(TestResult {
        name: "scheduler_catch_up".into(),
        passed: fired == vec![("once", 1u64), ("tick", 3u64)],
        detail: format!("35s → {:?}", fired),
    });

    let stopped = tick.map(|id| sched.stop(id)).unwrap_or(false);
    let after_stop = sched.advance(100.0);
    results.push(TestResult {
        name: "scheduler_stop".into(),
        passed: stopped && after_stop.is_empty() && sched.active_count() == 0,
        detail: format!("{} fired after stop", after_stop.len()),
    });

    results.push(TestResult {
        name: "scheduler_rejects_zero_period".into(),
        passed: sched.schedule_every(0.0, "bad").is_err(),
        detail: "period 0 rejected".into(),
    });

    results
}

// ── 6. Engine ───────────────────────────────────────────────────────────

fn validate_engine(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine ---");
    let mut results = Vec::new();

    let config = SimulationConfig {
        seed: Some(42),
        ..Default::default()
    };
    let mut engine = match SimulationEngine::new(config, t0()) {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "engine_create".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    if let Err(e) = engine.start() {
        results.push(TestResult {
            name: "engine_start".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }

    let mut first_notice_at = None;
    for second in 1..=20 {
        engine.update(1.0);
        if first_notice_at.is_none() && !engine.store().notifications().is_empty() {
            first_notice_at = Some(second);
        }
    }
    results.push(TestResult {
        name: "engine_first_notice".into(),
        passed: first_notice_at == Some(5),
        detail: format!("first notice after {:?}s", first_notice_at),
    });
    results.push(TestResult {
        name: "engine_scripted_notices".into(),
        passed: engine.store().notifications().len() == 2,
        detail: format!("{} notices after 20s", engine.store().notifications().len()),
    });

    let star = VesselId::from("1");
    let expected = 7220.0 / 10800.0 * 100.0;
    let progress = engine.store().vessel(&star).map(|v| v.progress).unwrap_or(-1.0);
    results.push(TestResult {
        name: "engine_progress_refresh".into(),
        passed: (progress - expected).abs() < 1e-6,
        detail: format!("Caribbean Star at {:.3}% (expected {:.3}%)", progress, expected),
    });

    let watched = engine.request_arrival_notice(&star).is_ok();
    for _ in 0..3600 {
        engine.update(1.0);
    }
    let arrivals = engine
        .store()
        .notifications()
        .for_vessel(&star)
        .filter(|n| n.kind == NotificationKind::Arrival)
        .count();
    results.push(TestResult {
        name: "engine_arrival_watch".into(),
        passed: watched && arrivals == 1 && engine.watched_vessels().is_empty(),
        detail: format!("{} arrival notices for Caribbean Star", arrivals),
    });

    let all_complete = engine
        .store()
        .vessels()
        .iter()
        .filter(|v| v.is_at_sea() && v.estimated_arrival.map_or(false, |eta| eta <= engine.now()))
        .all(|v| is_complete(v.progress));
    results.push(TestResult {
        name: "engine_overdue_complete".into(),
        passed: all_complete,
        detail: "overdue vessels at sea sit at 100%".into(),
    });

    engine.stop();
    let before = engine.store().notifications().len();
    engine.update(3600.0);
    results.push(TestResult {
        name: "engine_stop".into(),
        passed: !engine.is_progress_task_active() && engine.store().notifications().len() == before,
        detail: "no tasks fire after stop".into(),
    });

    // Out-of-range steps are dropped; a years-long step refreshes once
    let config = SimulationConfig {
        seed: Some(42),
        ..Default::default()
    };
    if let Ok(mut big) = SimulationEngine::new(config, t0()) {
        let started = big.start().is_ok();
        big.update(1e13);
        let dropped = big.now() == t0();
        big.update(1e8);
        results.push(TestResult {
            name: "engine_huge_steps".into(),
            passed: started && dropped && big.now() == t0() + Duration::seconds(100_000_000),
            detail: format!("clock after 1e13s and 1e8s steps: {}", big.now()),
        });
    }

    if verbose {
        print_notifications(&engine);
    }

    results
}

// ── Demo run ────────────────────────────────────────────────────────────

fn run_demo(secs: u32, config_path: Option<&Path>) -> Result<(), EngineError> {
    let config = match config_path {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };
    let start = Utc::now();

    println!("\n=== Demo run: {}s at {}x ===", secs, config.time_scale);
    let mut engine = SimulationEngine::new(config, start)?;
    engine.start()?;
    for _ in 0..secs {
        engine.update(1.0);
    }
    engine.stop();

    log::info!(
        "Demo finished after {:.0} simulated seconds",
        engine.sim_seconds()
    );
    println!(
        "Simulated {} ({:.0}s)\n",
        format_offset(engine.now() - start),
        engine.sim_seconds()
    );
    print_board(engine.store(), engine.now());
    print_notifications(&engine);
    Ok(())
}

fn format_offset(d: Duration) -> String {
    format!("{}h {}m {}s", d.num_hours(), d.num_minutes() % 60, d.num_seconds() % 60)
}

fn print_board(store: &FleetStore, now: DateTime<Utc>) {
    println!("  Fleet board:");
    for v in store.vessels() {
        let eta = match v.estimated_arrival {
            Some(eta) => TimeRemaining::until(eta.timestamp_millis(), now.timestamp_millis()).to_string(),
            None => "-".into(),
        };
        println!(
            "    {:16} {:10} {:9} {:>8} → {:8} {:5.1}%  ETA {:>7}  {:6.1} km to go  {:4.1} kn",
            v.name,
            v.kind.label(),
            v.status.label(),
            v.origin.name(),
            v.destination.name(),
            v.progress,
            eta,
            v.distance_to_destination_km(),
            v.speed_knots
        );
    }
}

fn print_notifications(engine: &SimulationEngine) {
    let center = engine.store().notifications();
    println!("  Notifications ({} unread):", center.unread_count());
    for n in center.iter() {
        let age = n.age(engine.now()).to_string();
        let mark = if n.read { ' ' } else { '•' };
        println!("    {} [{:9}] {:10} {}", mark, format!("{:?}", n.kind), age, n.message);
    }
}
