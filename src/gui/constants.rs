//! GUI-specific constants for layout, window sizes and effects

use egui;

/// Settings window dimensions
pub const SETTINGS_WIDTH: f32 = 420.0;
pub const SETTINGS_HEIGHT: f32 = 580.0;
pub const SETTINGS_MIN_WIDTH: f32 = 380.0;
pub const SETTINGS_MIN_HEIGHT: f32 = 500.0;
pub const SETTINGS_TITLE: &str = "Clock Settings";

/// Gap between the clock and the settings window placed above it
pub const SETTINGS_GAP: f32 = 20.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Clock face shadow
pub const SHADOW_BLUR: u8 = 10;
pub const SHADOW_OFFSET: [i8; 2] = [0, 2];
pub const SHADOW_COLOR: egui::Color32 = egui::Color32::from_black_alpha(77);

/// Inset of the face inside the transparent window when the shadow is shown
pub const SHADOW_MARGIN: f32 = 12.0;

/// Warning marker for font loading errors
pub const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
