//! Painting the clock face

use std::sync::mpsc::Receiver;
use std::time::Instant;

use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontFamily, FontId, Stroke, StrokeKind, epaint::Shadow,
};

use super::constants::{SHADOW_BLUR, SHADOW_COLOR, SHADOW_MARGIN, SHADOW_OFFSET};
use crate::clock::{ClockRenderer, FaceLayout};
use crate::config::{SettingField, Settings, SettingsStore};
use crate::constants::clock::DATE_ALPHA;

/// Resolved paint parameters, rebuilt only when appearance settings change
#[derive(Debug, Clone, PartialEq)]
pub struct FaceStyle {
    pub foreground: Color32,
    pub date_color: Color32,
    /// Background with the window opacity applied
    pub background: Color32,
    pub border: Option<Stroke>,
    pub corner_radius: CornerRadius,
    pub shadow: bool,
    pub fallback_size: f32,
}

impl FaceStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        let foreground = settings.foreground_color().to_color32();
        let [r, g, b] = settings.background_color().to_rgb_array();
        let alpha = (settings.window_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

        Self {
            foreground,
            date_color: foreground.gamma_multiply(DATE_ALPHA),
            background: Color32::from_rgba_unmultiplied(r, g, b, alpha),
            border: settings.show_border.then(|| {
                Stroke::new(settings.border_width as f32, settings.border_color().to_color32())
            }),
            corner_radius: CornerRadius::same(settings.corner_radius.clamp(0.0, 255.0).round() as u8),
            shadow: settings.show_shadow,
            fallback_size: settings.font_size as f32,
        }
    }
}

pub struct ClockView {
    style: FaceStyle,
    changes: Receiver<SettingField>,
}

impl ClockView {
    pub fn new(store: &mut SettingsStore) -> Self {
        Self {
            style: FaceStyle::from_settings(store.settings()),
            changes: store.subscribe(SettingField::APPEARANCE),
        }
    }

    #[cfg(test)]
    pub fn style(&self) -> &FaceStyle {
        &self.style
    }

    /// Rebuild the style if any appearance setting changed. Returns true if it did.
    pub fn sync_style(&mut self, settings: &Settings) -> bool {
        if self.changes.try_iter().count() == 0 {
            return false;
        }
        self.style = FaceStyle::from_settings(settings);
        true
    }

    /// Paint background, border and text into `rect`
    pub fn paint(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        renderer: &ClockRenderer,
        family: FontFamily,
        now: Instant,
    ) {
        let style = &self.style;
        let face = if style.shadow {
            rect.shrink(SHADOW_MARGIN)
        } else {
            rect
        };

        if style.shadow {
            let shadow = Shadow {
                offset: SHADOW_OFFSET,
                blur: SHADOW_BLUR,
                spread: 0,
                color: SHADOW_COLOR,
            };
            painter.add(shadow.as_shape(face, style.corner_radius));
        }
        painter.rect_filled(face, style.corner_radius, style.background);
        if let Some(stroke) = style.border {
            painter.rect_stroke(face, style.corner_radius, stroke, StrokeKind::Inside);
        }

        let time = renderer.time_text();
        let date = renderer.date_text();
        let layout = FaceLayout::fit(
            face.width(),
            face.height(),
            time.chars().count(),
            date.is_some(),
            style.fallback_size,
        );
        // The pulse enlarges the time line in place; the date does not move
        let pulsed_size = layout.time_size * renderer.scale(now);

        let top = face.center().y - layout.block_height(date.is_some()) / 2.0;
        painter.text(
            egui::pos2(face.center().x, top + layout.time_size / 2.0),
            Align2::CENTER_CENTER,
            time,
            FontId::new(pulsed_size, family.clone()),
            style.foreground,
        );
        if let Some(date) = date {
            painter.text(
                egui::pos2(
                    face.center().x,
                    top + layout.time_size + layout.spacing + layout.date_size / 2.0,
                ),
                Align2::CENTER_CENTER,
                date,
                FontId::new(layout.date_size, family),
                style.date_color,
            );
        }
    }
}
