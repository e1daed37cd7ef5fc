//! Simulation engine - main entry point for running the fleet simulation

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shiptrack_logic::progress::is_complete;

use crate::components::{Vessel, VesselId, VesselStatus};
use crate::config::SimulationConfig;
use crate::error::{EngineError, FleetError};
use crate::notifications::{NewNotification, NotificationKind};
use crate::scheduler::{Scheduler, TaskId};
use crate::seed::mock_fleet;
use crate::store::FleetStore;

/// Work the scheduler hands back to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum SimAction {
    /// Recompute progress for every vessel at sea
    RefreshProgress,
    /// Deliver a one-shot notification
    Notify(NewNotification),
}

/// Main simulation engine
pub struct SimulationEngine {
    /// Fleet state, notifications, selection and filter
    store: FleetStore,
    scheduler: Scheduler<SimAction>,
    /// Simulated wall clock at creation
    start: DateTime<Utc>,
    /// Simulated wall clock, always `start + sim_seconds`
    now: DateTime<Utc>,
    /// Simulated seconds since creation
    sim_seconds: f64,
    config: SimulationConfig,
    rng: StdRng,
    /// Vessels with a pending "notify me when it arrives" request
    arrival_watch: Vec<VesselId>,
    progress_task: Option<TaskId>,
    running: bool,
}

impl SimulationEngine {
    /// Create an engine with the built-in demo fleet anchored at `start`.
    pub fn new(config: SimulationConfig, start: DateTime<Utc>) -> Result<Self, EngineError> {
        let fleet = mock_fleet(start)?;
        Self::with_fleet(config, start, fleet)
    }

    /// Create an engine around an explicit fleet.
    pub fn with_fleet(config: SimulationConfig, start: DateTime<Utc>, fleet: Vec<Vessel>) -> Result<Self, EngineError> {
        config.validate()?;

        let mut store = FleetStore::new();
        store.set_vessels(fleet)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            store,
            scheduler: Scheduler::new(),
            start,
            now: start,
            sim_seconds: 0.0,
            config,
            rng,
            arrival_watch: Vec::new(),
            progress_task: None,
            running: false,
        })
    }

    /// Register the progress refresh and the scripted notices.
    ///
    /// Calling `start` on a running engine does nothing.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.running {
            return Ok(());
        }

        let progress = self
            .scheduler
            .schedule_every(self.config.progress_interval_secs, SimAction::RefreshProgress)?;
        self.progress_task = Some(progress);

        for notice in &self.config.scripted_notices {
            self.scheduler
                .schedule_once(notice.after_secs, SimAction::Notify(notice.to_notification()))?;
        }

        self.running = true;
        log::info!(
            "Simulation started: {} vessels, progress every {}s, {} scripted notices",
            self.store.vessel_count(),
            self.config.progress_interval_secs,
            self.config.scripted_notices.len()
        );
        Ok(())
    }

    /// Cancel every scheduled task. Pending one-shot notices are dropped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        let cancelled = self.scheduler.stop_all();
        self.scheduler.prune();
        self.progress_task = None;
        self.running = false;
        log::info!("Simulation stopped ({} tasks cancelled)", cancelled);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the simulation by `delta_seconds` of real time.
    ///
    /// The clock moves by `delta_seconds * time_scale`. Nothing happens while
    /// the engine is stopped. A step that would carry the clock outside the
    /// calendar range chrono can represent is dropped.
    pub fn update(&mut self, delta_seconds: f64) {
        if !self.running {
            return;
        }
        let scaled = delta_seconds * self.config.time_scale;
        if !(scaled > 0.0) || !scaled.is_finite() {
            return;
        }

        let sim_seconds = self.sim_seconds + scaled;
        let Some(now) = clock_at(self.start, sim_seconds) else {
            log::warn!("Dropping a {}s step: simulated clock would overflow", scaled);
            return;
        };
        self.sim_seconds = sim_seconds;
        self.now = now;

        for due in self.scheduler.advance(scaled) {
            match due.action {
                // Every missed period would see the same clock; one pass is enough
                SimAction::RefreshProgress => {
                    if due.count > 1 {
                        log::debug!("Progress refresh covers {} periods", due.count);
                    }
                    self.refresh_progress();
                }
                SimAction::Notify(notice) => {
                    log::info!("Notice for vessel {}: {}", notice.vessel_id, notice.message);
                    self.notify(notice);
                }
            }
        }
    }

    /// Recompute progress now and resolve any arrival watches.
    pub fn refresh_progress(&mut self) {
        let changes = self.store.refresh_at_sea_progress(self.now);
        log::debug!("Progress refreshed for {} vessels at sea", changes.len());

        for change in changes.iter().filter(|c| c.reached_arrival()) {
            log::info!("Vessel {} reached its ETA", change.id);
        }

        let now = self.now;
        let mut arrived = Vec::new();
        self.arrival_watch.retain(|id| match self.store.vessel(id) {
            Some(v) if has_arrived(&v, now) => {
                arrived.push(v);
                false
            }
            Some(_) => true,
            // Vessel vanished with a fleet reload
            None => false,
        });

        for vessel in arrived {
            let message = format!("{} has arrived at {}", vessel.name, vessel.destination);
            self.notify(NewNotification::new(vessel.id, NotificationKind::Arrival, message));
        }
    }

    /// "Notify me": acknowledge the request now and raise an arrival notice
    /// once the vessel reaches its ETA, whatever its phase.
    ///
    /// Vessels without an ETA are refused since the watch could never resolve.
    pub fn request_arrival_notice(&mut self, id: &VesselId) -> Result<String, FleetError> {
        let vessel = self
            .store
            .vessel(id)
            .ok_or_else(|| FleetError::UnknownVessel(id.clone()))?;
        if vessel.estimated_arrival.is_none() {
            return Err(FleetError::NoEstimatedArrival(vessel.id));
        }

        let notice = NewNotification::new(
            vessel.id.clone(),
            NotificationKind::Update,
            format!("You will be notified when {} arrives", vessel.name),
        );
        if !self.arrival_watch.contains(&vessel.id) {
            self.arrival_watch.push(vessel.id);
        }
        Ok(self.notify(notice))
    }

    /// Deliver a notification stamped with the simulated clock.
    pub fn notify(&mut self, notice: NewNotification) -> String {
        self.store.add_notification(notice, self.now, &mut self.rng)
    }

    /// Set time scale (1.0 = real-time, 60.0 = a minute per second, etc.)
    pub fn set_time_scale(&mut self, scale: f64) {
        self.config.time_scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
    }

    pub fn time_scale(&self) -> f64 {
        self.config.time_scale
    }

    /// Current simulated time
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Simulated seconds since the engine was created
    pub fn sim_seconds(&self) -> f64 {
        self.sim_seconds
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn store(&self) -> &FleetStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FleetStore {
        &mut self.store
    }

    pub fn watched_vessels(&self) -> &[VesselId] {
        &self.arrival_watch
    }

    pub fn is_progress_task_active(&self) -> bool {
        self.progress_task
            .map(|id| self.scheduler.is_active(id))
            .unwrap_or(false)
    }
}

/// A watched vessel has arrived once its ETA has passed, or once the
/// at-sea refresh has taken it to 100%.
fn has_arrived(vessel: &Vessel, now: DateTime<Utc>) -> bool {
    let eta_passed = vessel.estimated_arrival.map_or(false, |eta| eta <= now);
    eta_passed || (vessel.status == VesselStatus::AtSea && is_complete(vessel.progress))
}

/// `start` plus `seconds`, rounded to the millisecond. `None` past chrono's range.
fn clock_at(start: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    let ms = (seconds * 1000.0).round();
    if !(ms.abs() < i64::MAX as f64) {
        return None;
    }
    start.checked_add_signed(Duration::try_milliseconds(ms as i64)?)
}
