//! Systems - logic that operates on vessel components

mod progress;

pub use progress::*;
