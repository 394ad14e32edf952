//! Debounced auto-backup scheduling.
//!
//! Edits are frequent and backups are whole-state writes, so backups
//! run on a quiet-period debounce: every change marks the scheduler
//! dirty and restarts the timer, and a backup becomes due only once no
//! change has arrived for the full window. A single-flight guard keeps
//! one write in flight at a time; dirt that accumulates during a write
//! waits for the next poll after the write completes.
//!
//! The scheduler itself is pure bookkeeping over caller-supplied
//! instants, so the policy is testable without clocks or threads. The
//! caller owns the loop: mark on change, poll on a tick, run the
//! archive write when polling says so, then report completion.

use std::time::{Duration, Instant};
use tracing::debug;

/// Default quiet period before a backup becomes due.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(30);

/// Debounce and single-flight state for auto-backup.
#[derive(Debug)]
pub struct BackupScheduler {
    debounce: Duration,
    last_change: Option<Instant>,
    in_flight: bool,
}

impl BackupScheduler {
    /// Create a scheduler with the given quiet period.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_change: None,
            in_flight: false,
        }
    }

    /// Record a state change, restarting the quiet-period timer.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Whether a backup should start now. Returns `true` at most once
    /// per dirty period; the caller must report back via
    /// [`BackupScheduler::complete`].
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.in_flight {
            return false;
        }
        match self.last_change {
            Some(changed) if now.duration_since(changed) >= self.debounce => {
                self.last_change = None;
                self.in_flight = true;
                debug!("backup due after quiet period");
                true
            }
            _ => false,
        }
    }

    /// Report that the in-flight backup write finished (successfully or
    /// not). Changes marked during the write stay pending and become
    /// due on a later poll.
    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    /// Whether a write is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether unsaved changes are pending.
    pub fn dirty(&self) -> bool {
        self.last_change.is_some()
    }
}

impl Default for BackupScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    #[test]
    fn quiet_period_is_honored() {
        let mut sched = BackupScheduler::new(WINDOW);
        let start = Instant::now();
        sched.mark_dirty(start);

        assert!(!sched.poll(start + Duration::from_secs(2)));
        assert!(sched.poll(start + WINDOW));
    }

    #[test]
    fn new_changes_restart_the_timer() {
        let mut sched = BackupScheduler::new(WINDOW);
        let start = Instant::now();
        sched.mark_dirty(start);
        sched.mark_dirty(start + Duration::from_secs(4));

        assert!(!sched.poll(start + WINDOW));
        assert!(sched.poll(start + Duration::from_secs(4) + WINDOW));
    }

    #[test]
    fn clean_scheduler_never_fires() {
        let mut sched = BackupScheduler::new(WINDOW);
        assert!(!sched.poll(Instant::now() + WINDOW));
    }

    #[test]
    fn writes_are_single_flighted() {
        let mut sched = BackupScheduler::new(WINDOW);
        let start = Instant::now();
        sched.mark_dirty(start);
        assert!(sched.poll(start + WINDOW));
        assert!(sched.in_flight());

        // Dirt arriving mid-write defers to after completion
        sched.mark_dirty(start + WINDOW + Duration::from_secs(1));
        assert!(!sched.poll(start + WINDOW * 3));

        sched.complete();
        assert!(!sched.poll(start + WINDOW + Duration::from_secs(2)));
        assert!(sched.poll(start + WINDOW + Duration::from_secs(1) + WINDOW));
    }

    #[test]
    fn poll_fires_once_per_dirty_period() {
        let mut sched = BackupScheduler::new(WINDOW);
        let start = Instant::now();
        sched.mark_dirty(start);
        assert!(sched.poll(start + WINDOW));
        sched.complete();
        assert!(!sched.poll(start + WINDOW * 2));
        assert!(!sched.dirty());
    }
}
