//! Fleet store - the single state object behind the tracker
//!
//! Vessels live as entities in a `hecs` world; notifications, the current
//! selection and the list filter sit beside it. Every mutation goes through a
//! named operation on [`FleetStore`], and the store is owned by whoever drives
//! the simulation and lent out by reference.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shiptrack_logic::progress::clamp_progress;
use shiptrack_logic::Port;

use crate::components::*;
use crate::error::FleetError;
use crate::notifications::{NewNotification, NotificationCenter};
use crate::systems::{progress_system, ProgressChange};

/// List filter. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetFilter {
    pub status: Option<VesselStatus>,
    pub destination: Option<Port>,
}

impl FleetFilter {
    pub fn matches(&self, vessel: &Vessel) -> bool {
        self.status.map_or(true, |s| vessel.status == s)
            && self.destination.map_or(true, |d| vessel.destination == d)
    }
}

/// Partial filter change. Outer `None` keeps the current value,
/// `Some(None)` resets that field to "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub status: Option<Option<VesselStatus>>,
    pub destination: Option<Option<Port>>,
}

/// Fleet state: vessels, notifications, selection and filter
pub struct FleetStore {
    world: World,
    /// Spawn order, used for stable listing
    roster: Vec<Entity>,
    index: HashMap<VesselId, Entity>,
    notifications: NotificationCenter,
    selected: Option<VesselId>,
    filter: FleetFilter,
}

impl FleetStore {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            roster: Vec::new(),
            index: HashMap::new(),
            notifications: NotificationCenter::new(),
            selected: None,
            filter: FleetFilter::default(),
        }
    }

    // ── Vessels ─────────────────────────────────────────────────────────

    /// Replace the whole fleet. Rejects duplicate ids without touching the
    /// current fleet.
    pub fn set_vessels(&mut self, vessels: Vec<Vessel>) -> Result<(), FleetError> {
        let mut seen = HashSet::with_capacity(vessels.len());
        for v in &vessels {
            if !seen.insert(&v.id) {
                return Err(FleetError::DuplicateVessel(v.id.clone()));
            }
        }

        self.world.clear();
        self.roster.clear();
        self.index.clear();

        for vessel in vessels {
            let id = vessel.id.clone();
            let entity = self.world.spawn(vessel.into_components());
            self.roster.push(entity);
            self.index.insert(id, entity);
        }

        if let Some(selected) = &self.selected {
            if !self.index.contains_key(selected) {
                self.selected = None;
            }
        }

        log::info!("Fleet loaded: {} vessels", self.roster.len());
        Ok(())
    }

    pub fn vessel_count(&self) -> usize {
        self.roster.len()
    }

    pub fn contains(&self, id: &VesselId) -> bool {
        self.index.contains_key(id)
    }

    pub fn vessel(&self, id: &VesselId) -> Option<Vessel> {
        self.index.get(id).and_then(|&e| self.snapshot(e))
    }

    /// All vessels in load order
    pub fn vessels(&self) -> Vec<Vessel> {
        self.roster.iter().filter_map(|&e| self.snapshot(e)).collect()
    }

    /// Vessels passing the current filter, in load order
    pub fn filtered_vessels(&self) -> Vec<Vessel> {
        self.vessels()
            .into_iter()
            .filter(|v| self.filter.matches(v))
            .collect()
    }

    /// Apply a partial update and return the resulting snapshot.
    ///
    /// The id cannot change. Progress is clamped into [0, 100] and speed to
    /// non-negative.
    pub fn update_vessel(&mut self, id: &VesselId, update: VesselUpdate) -> Result<Vessel, FleetError> {
        let entity = self.entity(id)?;
        {
            let (identity, route, schedule, nav, manifest, voyage) = self
                .world
                .query_one_mut::<(
                    &mut Identity,
                    &mut Route,
                    &mut Schedule,
                    &mut Navigation,
                    &mut Manifest,
                    &mut Voyage,
                )>(entity)
                .map_err(|_| FleetError::UnknownVessel(id.clone()))?;

            if let Some(name) = update.name {
                identity.name = name;
            }
            if let Some(kind) = update.kind {
                identity.kind = kind;
            }
            if let Some(status) = update.status {
                voyage.status = status;
            }
            if let Some(origin) = update.origin {
                route.origin = origin;
            }
            if let Some(destination) = update.destination {
                route.destination = destination;
            }
            if let Some(departure) = update.departure {
                schedule.departure = departure;
            }
            if let Some(eta) = update.estimated_arrival {
                schedule.estimated_arrival = eta;
            }
            if let Some(position) = update.position {
                nav.position = position;
            }
            if let Some(speed) = update.speed_knots {
                nav.speed_knots = clamp_speed(speed);
            }
            if let Some(cargo) = update.cargo {
                manifest.cargo = cargo;
            }
            if let Some(capacity) = update.capacity {
                manifest.capacity = capacity;
            }
            if let Some(progress) = update.progress {
                voyage.progress = clamp_progress(progress);
            }
        }

        self.snapshot(entity)
            .ok_or_else(|| FleetError::UnknownVessel(id.clone()))
    }

    /// Recompute one vessel's progress from its schedule.
    ///
    /// Returns `Ok(None)` and leaves progress untouched when either timestamp
    /// is missing.
    pub fn update_vessel_progress(&mut self, id: &VesselId, now: DateTime<Utc>) -> Result<Option<f64>, FleetError> {
        let entity = self.entity(id)?;
        let (schedule, voyage) = self
            .world
            .query_one_mut::<(&Schedule, &mut Voyage)>(entity)
            .map_err(|_| FleetError::UnknownVessel(id.clone()))?;

        let progress = schedule.progress_at(now);
        if let Some(p) = progress {
            voyage.progress = p;
        }
        Ok(progress)
    }

    /// Recompute progress for every vessel at sea.
    pub fn refresh_at_sea_progress(&mut self, now: DateTime<Utc>) -> Vec<ProgressChange> {
        progress_system(&mut self.world, now)
    }

    // ── Selection & filter ──────────────────────────────────────────────

    pub fn select_vessel(&mut self, id: Option<&VesselId>) -> Result<(), FleetError> {
        match id {
            Some(id) => {
                self.entity(id)?;
                self.selected = Some(id.clone());
            }
            None => self.selected = None,
        }
        Ok(())
    }

    /// Current state of the selected vessel
    pub fn selected(&self) -> Option<Vessel> {
        self.selected.as_ref().and_then(|id| self.vessel(id))
    }

    pub fn filter(&self) -> FleetFilter {
        self.filter
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        if let Some(status) = update.status {
            self.filter.status = status;
        }
        if let Some(destination) = update.destination {
            self.filter.destination = destination;
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn add_notification(&mut self, new: NewNotification, now: DateTime<Utc>, rng: &mut impl Rng) -> String {
        self.notifications.push(new, now, rng)
    }

    pub fn mark_notification_read(&mut self, id: &str) -> bool {
        self.notifications.mark_read(id)
    }

    pub fn mark_all_notifications_read(&mut self) {
        self.notifications.mark_all_read();
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn entity(&self, id: &VesselId) -> Result<Entity, FleetError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| FleetError::UnknownVessel(id.clone()))
    }

    fn snapshot(&self, entity: Entity) -> Option<Vessel> {
        let e = self.world.entity(entity).ok()?;
        let identity = e.get::<&Identity>()?;
        let route = e.get::<&Route>()?;
        let schedule = e.get::<&Schedule>()?;
        let nav = e.get::<&Navigation>()?;
        let manifest = e.get::<&Manifest>()?;
        let voyage = e.get::<&Voyage>()?;
        Some(Vessel::from_components(
            &identity, &route, &schedule, &nav, &manifest, &voyage,
        ))
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}
