//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Settings file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "desktop-clock";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";
}

/// Ranges enforced by the settings form (and on load)
pub mod validation {
    pub const MIN_OPACITY: f64 = 0.1;
    pub const MAX_OPACITY: f64 = 1.0;
    pub const OPACITY_STEP: f64 = 0.05;

    pub const MIN_BORDER_WIDTH: f64 = 1.0;
    pub const MAX_BORDER_WIDTH: f64 = 20.0;

    pub const MIN_CORNER_RADIUS: f64 = 0.0;
    pub const MAX_CORNER_RADIUS: f64 = 50.0;
    pub const CORNER_RADIUS_STEP: f64 = 2.0;

    /// Smallest clock window (width, height)
    pub const MIN_WINDOW_WIDTH: f64 = 50.0;
    pub const MIN_WINDOW_HEIGHT: f64 = 30.0;
}

/// Clock face layout and timing
pub mod clock {
    /// Tick interval when seconds are shown
    pub const SECONDS_INTERVAL_SECS: u64 = 1;

    /// Tick interval when only minutes are shown
    pub const MINUTES_INTERVAL_SECS: u64 = 60;

    /// Vertical fill factor with and without the date line
    pub const VERTICAL_FACTOR_WITH_DATE: f32 = 0.55;
    pub const VERTICAL_FACTOR: f32 = 0.7;

    /// Fraction of the width the time text may occupy
    pub const HORIZONTAL_FILL: f32 = 0.9;

    /// Approximate glyph advance as a fraction of the font size
    pub const GLYPH_WIDTH_RATIO: f32 = 0.6;

    /// Date text size relative to the time text
    pub const DATE_SCALE: f32 = 0.3;

    /// Gap between time and date lines relative to the time text
    pub const LINE_SPACING: f32 = 0.05;

    /// Date text alpha relative to the foreground
    pub const DATE_ALPHA: f32 = 0.8;

    /// Pulse animation peak scale and duration of each half
    pub const PULSE_SCALE: f32 = 1.02;
    pub const PULSE_HALF_MS: u64 = 150;
}

/// Window placement
pub mod placement {
    /// Distance (px) within which the window center snaps to the screen center
    pub const SNAP_THRESHOLD: f32 = 15.0;

    /// Width of the invisible resize band along the clock's edges
    pub const RESIZE_MARGIN: f32 = 6.0;
}

/// Display naming
pub mod display {
    pub const BUILT_IN_NAME: &str = "Built-in Display";
    pub const EXTERNAL_NAME: &str = "External Display";

    /// RandR connector prefixes used by laptop panels
    pub const BUILT_IN_CONNECTORS: &[&str] = &["eDP", "LVDS", "DSI"];
}
