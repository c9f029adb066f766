//! The clock's flat preference record
//!
//! Every field is stored under a stable camelCase key in a flat JSON object.
//! Absent keys take the defaults below.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::HexColor;
use crate::constants::validation::*;

/// Identifies one persisted field, used for typed change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    SelectedDisplay,
    X,
    Y,
    Width,
    Height,
    ForegroundColor,
    BackgroundColor,
    BorderColor,
    ShowBorder,
    BorderWidth,
    CornerRadius,
    ShowShadow,
    FontName,
    FontSize,
    WindowOpacity,
    Use24Hour,
    ShowSeconds,
    ShowAmPm,
    UppercaseAmPm,
    ShowDate,
    DateFormat,
    AnimationEnabled,
}

impl SettingField {
    /// Fields whose change alters the formatted time or date text
    pub const FORMAT: &'static [SettingField] = &[
        SettingField::Use24Hour,
        SettingField::ShowSeconds,
        SettingField::ShowAmPm,
        SettingField::UppercaseAmPm,
        SettingField::ShowDate,
        SettingField::DateFormat,
    ];

    /// Fields that only change how the clock face is painted
    pub const APPEARANCE: &'static [SettingField] = &[
        SettingField::ForegroundColor,
        SettingField::BackgroundColor,
        SettingField::BorderColor,
        SettingField::ShowBorder,
        SettingField::BorderWidth,
        SettingField::CornerRadius,
        SettingField::ShowShadow,
        SettingField::FontSize,
        SettingField::WindowOpacity,
        SettingField::AnimationEnabled,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "selectedDisplayID")]
    pub selected_display_id: String,

    #[serde(rename = "clockX")]
    pub x: f64,
    #[serde(rename = "clockY")]
    pub y: f64,
    #[serde(rename = "clockWidth")]
    pub width: f64,
    #[serde(rename = "clockHeight")]
    pub height: f64,

    #[serde(rename = "foregroundColorHex")]
    pub foreground_color_hex: String,
    #[serde(rename = "backgroundColorHex")]
    pub background_color_hex: String,
    #[serde(rename = "borderColorHex")]
    pub border_color_hex: String,

    #[serde(rename = "showBorder")]
    pub show_border: bool,
    #[serde(rename = "borderWidth")]
    pub border_width: f64,
    #[serde(rename = "cornerRadius")]
    pub corner_radius: f64,
    #[serde(rename = "showShadow")]
    pub show_shadow: bool,

    #[serde(rename = "fontName")]
    pub font_name: String,
    /// Fallback text size when the window gives the auto-sizer nothing to work with
    #[serde(rename = "fontSize")]
    pub font_size: f64,

    #[serde(rename = "windowOpacity")]
    pub window_opacity: f64,

    #[serde(rename = "use24Hour")]
    pub use_24_hour: bool,
    #[serde(rename = "showSeconds")]
    pub show_seconds: bool,
    #[serde(rename = "showAMPM")]
    pub show_am_pm: bool,
    #[serde(rename = "uppercaseAMPM")]
    pub uppercase_am_pm: bool,
    #[serde(rename = "showDate")]
    pub show_date: bool,
    /// Unicode date pattern, e.g. `EEEE, MMMM d`
    #[serde(rename = "dateFormat")]
    pub date_format: String,

    #[serde(rename = "animationEnabled")]
    pub animation_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_display_id: String::new(),
            x: 100.0,
            y: 100.0,
            width: 400.0,
            height: 150.0,
            foreground_color_hex: HexColor::WHITE.to_hex(),
            background_color_hex: HexColor::BLACK.to_hex(),
            border_color_hex: HexColor::WHITE.to_hex(),
            show_border: false,
            border_width: 2.0,
            corner_radius: 12.0,
            show_shadow: false,
            font_name: "Monospace".to_string(),
            font_size: 72.0,
            window_opacity: 0.9,
            use_24_hour: false,
            show_seconds: true,
            show_am_pm: true,
            uppercase_am_pm: true,
            show_date: false,
            date_format: "EEEE, MMMM d".to_string(),
            animation_enabled: false,
        }
    }
}

impl Settings {
    pub fn foreground_color(&self) -> HexColor {
        parse_color_or(&self.foreground_color_hex, HexColor::WHITE, "foregroundColorHex")
    }

    pub fn background_color(&self) -> HexColor {
        parse_color_or(&self.background_color_hex, HexColor::BLACK, "backgroundColorHex")
    }

    pub fn border_color(&self) -> HexColor {
        parse_color_or(&self.border_color_hex, HexColor::WHITE, "borderColorHex")
    }

    /// Color setters store `#RRGGBB` uppercase; alpha is dropped
    pub fn set_foreground_color(&mut self, color: HexColor) {
        self.foreground_color_hex = color.to_hex();
    }

    pub fn set_background_color(&mut self, color: HexColor) {
        self.background_color_hex = color.to_hex();
    }

    pub fn set_border_color(&mut self, color: HexColor) {
        self.border_color_hex = color.to_hex();
    }

    /// Fields that differ between `self` and `other`
    pub fn changed_fields(&self, other: &Settings) -> Vec<SettingField> {
        let mut changed = Vec::new();
        let mut check = |differs: bool, field: SettingField| {
            if differs {
                changed.push(field);
            }
        };

        check(self.selected_display_id != other.selected_display_id, SettingField::SelectedDisplay);
        check(self.x != other.x, SettingField::X);
        check(self.y != other.y, SettingField::Y);
        check(self.width != other.width, SettingField::Width);
        check(self.height != other.height, SettingField::Height);
        check(self.foreground_color_hex != other.foreground_color_hex, SettingField::ForegroundColor);
        check(self.background_color_hex != other.background_color_hex, SettingField::BackgroundColor);
        check(self.border_color_hex != other.border_color_hex, SettingField::BorderColor);
        check(self.show_border != other.show_border, SettingField::ShowBorder);
        check(self.border_width != other.border_width, SettingField::BorderWidth);
        check(self.corner_radius != other.corner_radius, SettingField::CornerRadius);
        check(self.show_shadow != other.show_shadow, SettingField::ShowShadow);
        check(self.font_name != other.font_name, SettingField::FontName);
        check(self.font_size != other.font_size, SettingField::FontSize);
        check(self.window_opacity != other.window_opacity, SettingField::WindowOpacity);
        check(self.use_24_hour != other.use_24_hour, SettingField::Use24Hour);
        check(self.show_seconds != other.show_seconds, SettingField::ShowSeconds);
        check(self.show_am_pm != other.show_am_pm, SettingField::ShowAmPm);
        check(self.uppercase_am_pm != other.uppercase_am_pm, SettingField::UppercaseAmPm);
        check(self.show_date != other.show_date, SettingField::ShowDate);
        check(self.date_format != other.date_format, SettingField::DateFormat);
        check(self.animation_enabled != other.animation_enabled, SettingField::AnimationEnabled);

        changed
    }

    /// Clamp values that came from disk into the ranges the settings form allows.
    /// Setters never call this; only loading does.
    pub fn validate_and_clamp(&mut self) {
        clamp_field(&mut self.window_opacity, MIN_OPACITY, MAX_OPACITY, "windowOpacity");
        clamp_field(&mut self.border_width, MIN_BORDER_WIDTH, MAX_BORDER_WIDTH, "borderWidth");
        clamp_field(&mut self.corner_radius, MIN_CORNER_RADIUS, MAX_CORNER_RADIUS, "cornerRadius");

        if !self.width.is_finite() || self.width < MIN_WINDOW_WIDTH {
            warn!(width = self.width, min = MIN_WINDOW_WIDTH, "clockWidth below minimum, clamping");
            self.width = MIN_WINDOW_WIDTH;
        }
        if !self.height.is_finite() || self.height < MIN_WINDOW_HEIGHT {
            warn!(height = self.height, min = MIN_WINDOW_HEIGHT, "clockHeight below minimum, clamping");
            self.height = MIN_WINDOW_HEIGHT;
        }

        let defaults = Settings::default();
        if !self.x.is_finite() || !self.y.is_finite() {
            warn!(x = self.x, y = self.y, "Non-finite clock position, using default");
            self.x = defaults.x;
            self.y = defaults.y;
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            warn!(font_size = self.font_size, using = defaults.font_size, "fontSize not positive, using default");
            self.font_size = defaults.font_size;
        }
    }
}

fn parse_color_or(hex: &str, default: HexColor, key: &str) -> HexColor {
    HexColor::parse(hex).unwrap_or_else(|| {
        warn!(key = key, value = %hex, default = %default.to_hex(), "Invalid color hex, using default");
        default
    })
}

fn clamp_field(value: &mut f64, min: f64, max: f64, key: &str) {
    if value.is_nan() {
        warn!(key = key, min = min, "Value is NaN, clamping to minimum");
        *value = min;
    } else if *value < min {
        warn!(key = key, value = *value, min = min, "Value below minimum, clamping");
        *value = min;
    } else if *value > max {
        warn!(key = key, value = *value, max = max, "Value exceeds maximum, clamping");
        *value = max;
    }
}
