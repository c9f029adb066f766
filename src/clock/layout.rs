//! Font auto-sizing for the clock face

use crate::constants::clock::{
    DATE_SCALE, GLYPH_WIDTH_RATIO, HORIZONTAL_FILL, LINE_SPACING, VERTICAL_FACTOR,
    VERTICAL_FACTOR_WITH_DATE,
};

/// Text sizes for one frame of the clock face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub time_size: f32,
    pub date_size: f32,
    /// Gap between the time and date lines
    pub spacing: f32,
}

impl FaceLayout {
    pub fn from_time_size(time_size: f32) -> Self {
        Self {
            time_size,
            date_size: time_size * DATE_SCALE,
            spacing: time_size * LINE_SPACING,
        }
    }

    /// Size the text to fit `width` x `height`, or use `fallback` when there
    /// is nothing to measure
    pub fn fit(width: f32, height: f32, char_count: usize, show_date: bool, fallback: f32) -> Self {
        let size = fit_font_size(width, height, char_count, show_date).unwrap_or(fallback);
        Self::from_time_size(size)
    }

    /// Combined height of the time line, and the date line if shown
    pub fn block_height(&self, show_date: bool) -> f32 {
        if show_date {
            self.time_size + self.spacing + self.date_size
        } else {
            self.time_size
        }
    }
}

/// Largest time-text size that fits the area: `min(h * vf, (w * 0.9) / (n * 0.6))`.
/// `None` for empty text or a degenerate area.
pub fn fit_font_size(width: f32, height: f32, char_count: usize, show_date: bool) -> Option<f32> {
    if char_count == 0 || !(width > 0.0) || !(height > 0.0) {
        return None;
    }

    let vertical_factor = if show_date {
        VERTICAL_FACTOR_WITH_DATE
    } else {
        VERTICAL_FACTOR
    };
    let by_height = height * vertical_factor;
    let by_width = (width * HORIZONTAL_FILL) / (char_count as f32 * GLYPH_WIDTH_RATIO);
    Some(by_height.min(by_width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_width_bound() {
        // "12:34:56" in the default 400x150 window
        let size = fit_font_size(400.0, 150.0, 8, false).unwrap();
        assert!(approx(size, 75.0));
    }

    #[test]
    fn test_height_bound_with_date() {
        let size = fit_font_size(400.0, 100.0, 5, true).unwrap();
        assert!(approx(size, 55.0));
        let size = fit_font_size(400.0, 100.0, 5, false).unwrap();
        assert!(approx(size, 70.0));
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(fit_font_size(400.0, 150.0, 0, false), None);
        assert_eq!(fit_font_size(0.0, 150.0, 8, false), None);
        assert_eq!(fit_font_size(400.0, -1.0, 8, false), None);
        assert_eq!(fit_font_size(f32::NAN, 150.0, 8, false), None);
    }

    #[test]
    fn test_layout_derives_date_and_spacing() {
        let layout = FaceLayout::fit(400.0, 150.0, 8, true, 72.0);
        assert!(approx(layout.time_size, 75.0));
        assert!(approx(layout.date_size, 22.5));
        assert!(approx(layout.spacing, 3.75));
        assert!(approx(layout.block_height(true), 101.25));
        assert!(approx(layout.block_height(false), 75.0));
    }

    #[test]
    fn test_fallback_size() {
        let layout = FaceLayout::fit(0.0, 0.0, 8, false, 72.0);
        assert_eq!(layout.time_size, 72.0);
    }
}
