//! Cosmetic pulse: scale up briefly and back on each tick

use std::time::{Duration, Instant};

use crate::constants::clock::{PULSE_HALF_MS, PULSE_SCALE};

#[derive(Debug, Default)]
pub struct Pulse {
    started: Option<Instant>,
}

impl Pulse {
    pub fn trigger(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub fn cancel(&mut self) {
        self.started = None;
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|started| now.duration_since(started) < Self::half() * 2)
    }

    /// Current scale factor; 1.0 when idle
    pub fn scale(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return 1.0;
        };
        let t = now.duration_since(started).as_secs_f32() / Self::half().as_secs_f32();
        let progress = match t {
            t if t < 1.0 => ease_in_out(t),
            t if t < 2.0 => ease_in_out(2.0 - t),
            _ => 0.0,
        };
        1.0 + (PULSE_SCALE - 1.0) * progress
    }

    fn half() -> Duration {
        Duration::from_millis(PULSE_HALF_MS)
    }
}

fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
