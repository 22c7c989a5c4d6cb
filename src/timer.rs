use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// A point in time as seen by both the timer machinery (monotonic) and the
/// session records (wall clock).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moment {
    pub instant: Instant,
    pub wall: DateTime<Local>,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
            wall: Local::now(),
        }
    }

    /// The same moment shifted forward by `delay` on both clocks.
    pub fn after(self, delay: Duration) -> Self {
        let wall_delay =
            chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            instant: self.instant + delay,
            wall: self.wall + wall_delay,
        }
    }
}

#[derive(Debug, Clone)]
struct Pending<E> {
    deadline: Instant,
    event: E,
}

/// A timer taken off the clock, remembering how long it still had to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Suspended<E> {
    pub event: E,
    pub remaining: Duration,
}

/// Single-slot cancelable timer.
///
/// At most one event is ever pending. Scheduling replaces (and thereby
/// cancels) whatever was pending before, so a superseded event can never be
/// delivered.
#[derive(Debug, Clone)]
pub struct Timer<E> {
    pending: Option<Pending<E>>,
}

impl<E> Default for Timer<E> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<E> Timer<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, from: Instant, delay: Duration, event: E) {
        self.pending = Some(Pending {
            deadline: from + delay,
            event,
        });
    }

    /// Drops the pending event, returning it if there was one.
    pub fn cancel(&mut self) -> Option<E> {
        self.pending.take().map(|p| p.event)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Takes the pending event once its deadline has passed.
    ///
    /// Returns the deadline alongside the event so follow-up timers can be
    /// anchored to when this one was due rather than when it was noticed.
    pub fn poll(&mut self, now: Instant) -> Option<(Instant, E)> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| (p.deadline, p.event)),
            _ => None,
        }
    }

    pub fn suspend(&mut self, now: Instant) -> Option<Suspended<E>> {
        self.pending.take().map(|p| Suspended {
            remaining: p.deadline.saturating_duration_since(now),
            event: p.event,
        })
    }

    pub fn resume(&mut self, now: Instant, suspended: Suspended<E>) {
        self.schedule(now, suspended.remaining, suspended.event);
    }
}
