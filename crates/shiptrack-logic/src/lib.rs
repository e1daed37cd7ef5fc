//! Pure voyage logic for ShipTrack.
//!
//! This crate contains the arithmetic behind the fleet tracker and nothing
//! else. Functions take plain numbers and return plain numbers, so they are
//! unit-testable and callable from the engine, the C ABI and the headless
//! harness alike.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Earth radius, time units, progress bounds |
//! | [`display`] | Time-remaining and notification-age breakdowns |
//! | [`geo`] | Geographic points and haversine great-circle distance |
//! | [`ports`] | The two ports served by the fleet and their coordinates |
//! | [`progress`] | Clamped journey completion from three timestamps |

pub mod constants;
pub mod display;
pub mod geo;
pub mod ports;
pub mod progress;

pub use geo::{compute_distance, GeoPoint};
pub use ports::Port;
pub use progress::compute_progress;
