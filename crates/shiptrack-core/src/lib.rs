//! ShipTrack Core - Fleet Simulation Engine
//!
//! A small fleet shuttling between Curacao and Bonaire, with journey
//! progress recomputed on a timer and notifications raised as vessels depart
//! and arrive.
//!
//! # Architecture
//!
//! The fleet uses an Entity Component System (ECS) world via `hecs`:
//! - **Entities**: Vessels
//! - **Components**: Pure data attached to vessels (Route, Schedule, Voyage, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Around the world sit the [`store::FleetStore`] (the one state object every
//! mutation goes through), the [`scheduler::Scheduler`] (repeating and
//! one-shot timers with explicit cancellation) and the
//! [`engine::SimulationEngine`] tying them to a simulated clock.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use shiptrack_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(SimulationConfig::default(), Utc::now()).unwrap();
//! engine.start().unwrap();
//!
//! // Drive the simulation
//! loop {
//!     engine.update(1.0); // one second
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod notifications;
pub mod scheduler;
pub mod seed;
pub mod store;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{ScriptedNotice, SimulationConfig};
    pub use crate::engine::SimulationEngine;
    pub use crate::error::{EngineError, FleetError};
    pub use crate::notifications::{NewNotification, Notification, NotificationKind};
    pub use crate::store::{FilterUpdate, FleetFilter, FleetStore};
}
