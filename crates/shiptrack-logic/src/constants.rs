//! Shared numeric constants.
//!
//! Plain values with no runtime dependency. The engine, the C ABI and the
//! simtest harness all read these.

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Progress value of a vessel that has not left yet.
pub const PROGRESS_MIN: f64 = 0.0;
/// Progress value of a vessel at or past its ETA.
pub const PROGRESS_MAX: f64 = 100.0;

pub mod time {
    pub const MS_PER_SECOND: i64 = 1_000;
    pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
    pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
    pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
}

/// Default cadence of the simulation driver, in simulated seconds.
pub mod cadence {
    /// Progress refresh for vessels at sea.
    pub const PROGRESS_REFRESH_SECS: f64 = 10.0;
    /// Scripted arrival notice after start.
    pub const ARRIVAL_NOTICE_SECS: f64 = 5.0;
    /// Scripted departure notice after start.
    pub const DEPARTURE_NOTICE_SECS: f64 = 15.0;
}
