//! Clock face state: formatted text, tick schedule and pulse animation
//!
//! The renderer is polled once per frame. It owns no window; the GUI asks it
//! for the current strings and scale and paints them.

mod format;
mod layout;
mod pulse;
mod ticker;

pub use format::{DATE_PRESETS, Formatter};
pub use layout::FaceLayout;

use format::{FormatterCache, TimeFormatKey};
use pulse::Pulse;
use ticker::Ticker;

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::{SettingField, Settings, SettingsStore};

/// Repaint cadence while the pulse is animating
const ANIMATION_FRAME: Duration = Duration::from_millis(16);

pub struct ClockRenderer {
    changes: Receiver<SettingField>,
    ticker: Ticker,
    pulse: Pulse,
    formatters: FormatterCache,
    time_text: String,
    date_text: Option<String>,
}

impl ClockRenderer {
    /// Create a stopped renderer listening for format-affecting setting changes
    pub fn new(store: &mut SettingsStore) -> Self {
        Self {
            changes: store.subscribe(SettingField::FORMAT),
            ticker: Ticker::new(),
            pulse: Pulse::default(),
            formatters: FormatterCache::new(),
            time_text: String::new(),
            date_text: None,
        }
    }

    /// The clock window became visible
    pub fn appear(&mut self, settings: &Settings, now: Instant) {
        info!(show_seconds = settings.show_seconds, "Clock visible, starting ticks");
        self.ticker.start(settings.show_seconds, now);
    }

    /// The clock window was hidden or is going away
    pub fn disappear(&mut self) {
        self.ticker.stop();
        self.pulse.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Apply pending setting changes and any due tick. Returns true when the
    /// face needs repainting.
    pub fn update(&mut self, settings: &Settings, now: Instant, wall: NaiveDateTime) -> bool {
        let mut dirty = false;

        let changed: Vec<SettingField> = self.changes.try_iter().collect();
        if !changed.is_empty() {
            debug!(fields = ?changed, "Format settings changed");
            if changed.contains(&SettingField::ShowSeconds)
                && self.ticker.restart_if_running(settings.show_seconds, now)
            {
                debug!(interval = ?self.ticker.interval(), "Rescheduled ticks");
            }
            self.reformat(settings, wall);
            dirty = true;
        }

        if self.ticker.poll(now) {
            self.reformat(settings, wall);
            if settings.animation_enabled && settings.show_seconds {
                self.pulse.trigger(now);
            }
            dirty = true;
        }

        dirty || self.pulse.is_active(now)
    }

    /// Recompute the time and date strings for `wall`
    pub fn reformat(&mut self, settings: &Settings, wall: NaiveDateTime) {
        let key = TimeFormatKey::from_settings(settings);
        self.time_text = self.formatters.time_formatter(key).format(&wall);
        self.date_text = settings
            .show_date
            .then(|| self.formatters.date_formatter(&settings.date_format).format(&wall));
    }

    pub fn time_text(&self) -> &str {
        &self.time_text
    }

    pub fn date_text(&self) -> Option<&str> {
        self.date_text.as_deref()
    }

    /// Pulse scale factor for the face at `now`
    pub fn scale(&self, now: Instant) -> f32 {
        self.pulse.scale(now)
    }

    /// How long until something on the face changes, `None` when stopped
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let tick = self.ticker.time_until_next(now);
        if self.pulse.is_active(now) {
            Some(tick.map_or(ANIMATION_FRAME, |tick| tick.min(ANIMATION_FRAME)))
        } else {
            tick
        }
    }
}
