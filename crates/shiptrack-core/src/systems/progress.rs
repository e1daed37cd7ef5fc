//! Progress system - recomputes journey completion for vessels at sea

use chrono::{DateTime, Utc};
use hecs::World;

use crate::components::{Identity, Schedule, VesselId, VesselStatus, Voyage};

/// One progress write-back
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressChange {
    pub id: VesselId,
    pub before: f64,
    pub after: f64,
}

impl ProgressChange {
    /// Did this write take the vessel to 100%?
    pub fn reached_arrival(&self) -> bool {
        self.before < shiptrack_logic::constants::PROGRESS_MAX
            && shiptrack_logic::progress::is_complete(self.after)
    }
}

/// Write fresh progress into every at-sea vessel with a complete schedule.
///
/// Vessels in other phases, or missing either timestamp, are skipped and keep
/// whatever progress they had.
pub fn progress_system(world: &mut World, now: DateTime<Utc>) -> Vec<ProgressChange> {
    let mut changes = Vec::new();

    for (_, (identity, schedule, voyage)) in world.query_mut::<(&Identity, &Schedule, &mut Voyage)>() {
        if voyage.status != VesselStatus::AtSea {
            continue;
        }
        let Some(progress) = schedule.progress_at(now) else {
            continue;
        };

        changes.push(ProgressChange {
            id: identity.id.clone(),
            before: voyage.progress,
            after: progress,
        });
        voyage.progress = progress;
    }

    changes
}
