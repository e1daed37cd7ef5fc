//! Component definitions for the fleet world.
//!
//! Components are pure data structs attached to vessel entities.
//! They have no behavior - that lives in systems and the store.

mod vessel;
mod view;

pub use vessel::*;
pub use view::*;
