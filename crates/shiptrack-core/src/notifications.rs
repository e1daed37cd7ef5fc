//! Notification center - departure, arrival and update notices for the fleet
//!
//! Notices are kept newest first. They can only be marked read or cleared
//! all at once; there is no individual deletion.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shiptrack_logic::display::Age;

use crate::components::VesselId;

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Departure,
    Arrival,
    Delay,
    Update,
}

/// A delivered notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Vessel this notice is about; not checked against the fleet
    pub vessel_id: VesselId,
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// How long ago the notice was raised, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Age {
        Age::since(self.timestamp.timestamp_millis(), now.timestamp_millis())
    }
}

/// Caller-supplied part of a notification; id, timestamp and read flag are
/// filled in by the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub vessel_id: VesselId,
    pub kind: NotificationKind,
    pub message: String,
}

impl NewNotification {
    pub fn new(vessel_id: impl Into<VesselId>, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            vessel_id: vessel_id.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Holds delivered notifications, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a notification and return its generated id.
    pub fn push(&mut self, new: NewNotification, timestamp: DateTime<Utc>, rng: &mut impl Rng) -> String {
        let id = loop {
            let candidate = random_id(rng);
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };

        log::debug!("Notification {} ({:?}) for vessel {}", id, new.kind, new.vessel_id);

        self.notifications.insert(
            0,
            Notification {
                id: id.clone(),
                vessel_id: new.vessel_id,
                kind: new.kind,
                message: new.message,
                timestamp,
                read: false,
            },
        );
        id
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Mark one notification read. Returns `false` for an unknown id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn for_vessel<'a>(&'a self, vessel_id: &'a VesselId) -> impl Iterator<Item = &'a Notification> {
        self.notifications.iter().filter(move |n| &n.vessel_id == vessel_id)
    }
}

fn random_id(rng: &mut impl Rng) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
