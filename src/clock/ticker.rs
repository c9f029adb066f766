//! Periodic tick schedule
//!
//! Deadline-based so it can be polled from the UI loop: entering `Running`
//! makes the first tick due immediately, later ticks follow at the fixed
//! interval.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::constants::clock::{MINUTES_INTERVAL_SECS, SECONDS_INTERVAL_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    Stopped,
    Running { interval: Duration, next_due: Instant },
}

#[derive(Debug)]
pub struct Ticker {
    state: TickerState,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            state: TickerState::Stopped,
        }
    }

    pub fn interval_for(show_seconds: bool) -> Duration {
        if show_seconds {
            Duration::from_secs(SECONDS_INTERVAL_SECS)
        } else {
            Duration::from_secs(MINUTES_INTERVAL_SECS)
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TickerState::Running { .. })
    }

    pub fn interval(&self) -> Option<Duration> {
        match self.state {
            TickerState::Running { interval, .. } => Some(interval),
            TickerState::Stopped => None,
        }
    }

    /// Enter `Running`, replacing any current schedule. A tick is due at `now`.
    pub fn start(&mut self, show_seconds: bool, now: Instant) {
        let interval = Self::interval_for(show_seconds);
        debug!(interval = ?interval, "Ticker running");
        self.state = TickerState::Running {
            interval,
            next_due: now,
        };
    }

    /// Re-enter `Running` with the interval for `show_seconds`, only if
    /// currently running. Returns whether a new schedule was set.
    pub fn restart_if_running(&mut self, show_seconds: bool, now: Instant) -> bool {
        if self.is_running() {
            self.start(show_seconds, now);
            true
        } else {
            false
        }
    }

    /// Cancel any pending tick. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.is_running() {
            debug!("Ticker stopped");
        }
        self.state = TickerState::Stopped;
    }

    /// Returns true if a tick is due at `now`, and schedules the next one
    pub fn poll(&mut self, now: Instant) -> bool {
        let TickerState::Running { interval, next_due } = &mut self.state else {
            return false;
        };
        if now < *next_due {
            return false;
        }

        let next = *next_due + *interval;
        // After a stall (suspend, slow frame) skip missed ticks instead of bursting
        *next_due = if next <= now { now + *interval } else { next };
        true
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TickerState::Running { next_due, .. } => Some(next_due.saturating_duration_since(now)),
            TickerState::Stopped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_selection() {
        assert_eq!(Ticker::interval_for(true), Duration::from_secs(1));
        assert_eq!(Ticker::interval_for(false), Duration::from_secs(60));
    }

    #[test]
    fn test_start_ticks_immediately_then_on_interval() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new();
        ticker.start(true, t0);

        assert!(ticker.poll(t0));
        assert!(!ticker.poll(t0 + Duration::from_millis(500)));
        assert!(ticker.poll(t0 + Duration::from_secs(1)));
        assert!(!ticker.poll(t0 + Duration::from_millis(1500)));
        assert!(ticker.poll(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_minute_interval() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new();
        ticker.start(false, t0);
        assert!(ticker.poll(t0));
        assert!(!ticker.poll(t0 + Duration::from_secs(59)));
        assert!(ticker.poll(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_toggle_seconds_reschedules_with_immediate_tick() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new();
        ticker.start(false, t0);
        assert!(ticker.poll(t0));

        let t1 = t0 + Duration::from_secs(10);
        assert!(ticker.restart_if_running(true, t1));
        assert_eq!(ticker.interval(), Some(Duration::from_secs(1)));
        assert!(ticker.poll(t1));
        assert!(ticker.poll(t1 + Duration::from_secs(1)));
    }

    #[test]
    fn test_restart_when_stopped_is_noop() {
        let mut ticker = Ticker::new();
        assert!(!ticker.restart_if_running(true, Instant::now()));
        assert!(!ticker.is_running());
        assert_eq!(ticker.interval(), None);
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new();
        ticker.stop();
        ticker.start(true, t0);
        ticker.stop();
        ticker.stop();

        assert!(!ticker.poll(t0 + Duration::from_secs(5)));
        assert_eq!(ticker.time_until_next(t0), None);
    }

    #[test]
    fn test_stall_skips_missed_ticks() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new();
        ticker.start(true, t0);
        assert!(ticker.poll(t0));

        let late = t0 + Duration::from_secs(30);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late + Duration::from_millis(10)));
        assert_eq!(ticker.time_until_next(late), Some(Duration::from_secs(1)));
    }
}
