//! Scheduled tasks - repeating and one-shot timers with explicit cancellation
//!
//! The scheduler owns no clock. The caller advances it by a delta in
//! simulated seconds and gets back the actions that came due, in firing
//! order. A repeating task that misses several periods in one advance comes
//! due once, carrying the number of periods it covers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u32);

/// When a task fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// Every `period` seconds, first firing one period after scheduling
    Every(f64),
    /// Once, `delay` seconds after scheduling
    Once(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Running,
    /// Cancelled by the caller
    Stopped,
    /// One-shot task that has fired
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScheduleError {
    #[error("task period must be positive, got {0}")]
    NonPositivePeriod(f64),
    #[error("task delay must be finite and non-negative, got {0}")]
    InvalidDelay(f64),
}

/// An action that came due during one advance
#[derive(Debug, Clone, PartialEq)]
pub struct Due<A> {
    pub action: A,
    /// Periods elapsed for a repeating task; always 1 for a one-shot
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct ScheduledTask<A> {
    pub id: TaskId,
    pub trigger: Trigger,
    pub action: A,
    pub state: TaskState,
    /// Seconds until the next firing
    remaining: f64,
    /// Periods fired so far
    pub fired: u64,
}

impl<A> ScheduledTask<A> {
    pub fn is_active(&self) -> bool {
        self.state == TaskState::Running
    }
}

/// Set of timers driven by [`Scheduler::advance`]
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    tasks: Vec<ScheduledTask<A>>,
    next_id: u32,
    /// Seconds advanced since creation
    elapsed: f64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
            elapsed: 0.0,
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `action` every `period` seconds until stopped.
    pub fn schedule_every(&mut self, period: f64, action: A) -> Result<TaskId, ScheduleError> {
        if !(period > 0.0) || !period.is_finite() {
            return Err(ScheduleError::NonPositivePeriod(period));
        }
        Ok(self.insert(Trigger::Every(period), period, action))
    }

    /// Fire `action` once after `delay` seconds.
    pub fn schedule_once(&mut self, delay: f64, action: A) -> Result<TaskId, ScheduleError> {
        if !(delay >= 0.0) || !delay.is_finite() {
            return Err(ScheduleError::InvalidDelay(delay));
        }
        Ok(self.insert(Trigger::Once(delay), delay, action))
    }

    fn insert(&mut self, trigger: Trigger, remaining: f64, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            trigger,
            action,
            state: TaskState::Running,
            remaining,
            fired: 0,
        });
        id
    }

    /// Cancel a task. Returns `true` if it was running.
    pub fn stop(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) if task.is_active() => {
                task.state = TaskState::Stopped;
                true
            }
            _ => false,
        }
    }

    /// Cancel every running task. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for task in self.tasks.iter_mut().filter(|t| t.is_active()) {
            task.state = TaskState::Stopped;
            stopped += 1;
        }
        stopped
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.get(id).map(|t| t.is_active()).unwrap_or(false)
    }

    pub fn get(&self, id: TaskId) -> Option<&ScheduledTask<A>> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_active()).count()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Drop tasks that can never fire again.
    pub fn prune(&mut self) {
        self.tasks.retain(|t| t.is_active());
    }

    /// Advance all running tasks by `delta` seconds and collect due actions.
    ///
    /// Actions are ordered by the time they (last) came due; ties keep
    /// scheduling order. Negative or non-finite deltas advance nothing.
    pub fn advance(&mut self, delta: f64) -> Vec<Due<A>> {
        if !(delta > 0.0) || !delta.is_finite() {
            return Vec::new();
        }
        let start = self.elapsed;
        self.elapsed += delta;

        // (due offset within this advance, scheduling order, due)
        let mut due: Vec<(f64, u32, Due<A>)> = Vec::new();

        for task in self.tasks.iter_mut().filter(|t| t.state == TaskState::Running) {
            let offset = task.remaining;
            if offset > delta {
                task.remaining -= delta;
                continue;
            }
            match task.trigger {
                Trigger::Once(_) => {
                    due.push((offset, task.id.0, Due { action: task.action.clone(), count: 1 }));
                    task.fired += 1;
                    task.remaining = 0.0;
                    task.state = TaskState::Finished;
                }
                Trigger::Every(period) => {
                    let (count, last) = periods_due(offset, period, delta);
                    due.push((last, task.id.0, Due { action: task.action.clone(), count }));
                    task.fired = task.fired.saturating_add(count);
                    let next = last + period - delta;
                    // Past the u64 range the phase is lost; restart one period out
                    task.remaining = if next > 0.0 { next } else { period };
                }
            }
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        if !due.is_empty() {
            log::trace!("{} task(s) due between t={:.1}s and t={:.1}s", due.len(), start, self.elapsed);
        }
        due.into_iter().map(|(_, _, d)| d).collect()
    }
}

/// Firings of a repeating task whose next firing is `offset` seconds into a
/// step of `delta` seconds: how many, and the offset of the last one.
fn periods_due(offset: f64, period: f64, delta: f64) -> (u64, f64) {
    // f64 -> u64 casts saturate
    let mut extra = ((delta - offset) / period).floor().max(0.0) as u64;
    let mut last = offset + extra as f64 * period;
    // Rounding can land the last firing one period past the step
    if last > delta && extra > 0 {
        extra -= 1;
        last -= period;
    }
    (extra.saturating_add(1), last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_fires_each_period() {
        let mut s = Scheduler::new();
        let id = s.schedule_every(10.0, "tick").unwrap();

        assert!(s.advance(9.0).is_empty());
        assert_eq!(s.advance(1.0), vec![Due { action: "tick", count: 1 }]);
        // Three periods in one step come due together
        assert_eq!(s.advance(30.0), vec![Due { action: "tick", count: 3 }]);
        assert_eq!(s.get(id).unwrap().fired, 4);
        // Phase is kept: next firing 10s later
        assert!(s.advance(9.5).is_empty());
        assert_eq!(s.advance(0.5).len(), 1);
    }

    #[test]
    fn test_huge_step_is_coalesced() {
        let mut s = Scheduler::new();
        let id = s.schedule_every(10.0, "tick").unwrap();

        let due = s.advance(1e8);
        assert_eq!(due, vec![Due { action: "tick", count: 10_000_000 }]);
        assert_eq!(s.get(id).unwrap().fired, 10_000_000);

        let due = s.advance(1e300);
        assert_eq!(due.len(), 1);
        assert!(due[0].count > 0);
        assert!(s.is_active(id));
        assert_eq!(s.advance(10.0).len(), 1);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut s = Scheduler::new();
        let id = s.schedule_once(5.0, "ping").unwrap();
        assert!(s.advance(4.9).is_empty());
        assert_eq!(s.advance(0.2), vec![Due { action: "ping", count: 1 }]);
        assert!(s.advance(100.0).is_empty());
        assert_eq!(s.get(id).unwrap().state, TaskState::Finished);
        assert!(!s.is_active(id));
    }

    #[test]
    fn test_stop_cancels() {
        let mut s = Scheduler::new();
        let every = s.schedule_every(1.0, "a").unwrap();
        let once = s.schedule_once(2.0, "b").unwrap();

        assert!(s.stop(every));
        assert!(!s.stop(every));
        assert_eq!(s.advance(5.0), vec![Due { action: "b", count: 1 }]);
        assert!(!s.stop(once));
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_stop_all() {
        let mut s = Scheduler::new();
        s.schedule_every(1.0, 1).unwrap();
        s.schedule_every(2.0, 2).unwrap();
        s.schedule_once(3.0, 3).unwrap();
        assert_eq!(s.stop_all(), 3);
        assert!(s.advance(10.0).is_empty());
        s.prune();
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn test_due_order_is_chronological() {
        let mut s = Scheduler::new();
        s.schedule_every(10.0, "progress").unwrap();
        s.schedule_once(15.0, "departure").unwrap();
        s.schedule_once(5.0, "arrival").unwrap();

        let fired: Vec<_> = s.advance(20.0).into_iter().map(|d| d.action).collect();
        // The progress task comes due last at t=20
        assert_eq!(fired, vec!["arrival", "departure", "progress"]);

        let fired: Vec<_> = s.advance(5.0).into_iter().map(|d| d.action).collect();
        assert!(fired.is_empty());
    }

    #[test]
    fn test_rejects_bad_periods() {
        let mut s: Scheduler<()> = Scheduler::new();
        assert_eq!(s.schedule_every(0.0, ()), Err(ScheduleError::NonPositivePeriod(0.0)));
        assert!(s.schedule_every(-1.0, ()).is_err());
        assert!(s.schedule_every(f64::NAN, ()).is_err());
        assert!(s.schedule_once(-0.5, ()).is_err());
        assert!(s.schedule_once(0.0, ()).is_ok());
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut s = Scheduler::new();
        s.schedule_once(0.0, "now").unwrap();
        assert!(s.advance(0.0).is_empty());
        assert!(s.advance(-3.0).is_empty());
        assert!(s.advance(f64::NAN).is_empty());
        assert_eq!(s.advance(0.001), vec![Due { action: "now", count: 1 }]);
    }
}
