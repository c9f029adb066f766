use eframe::egui;

use crate::color::HexColor;
use crate::config::Settings;
use crate::constants::validation::*;
use crate::gui::constants::*;

/// Color picker for a stored hex string; malformed values show `default`.
/// Returns the picked color when it changed.
fn color_row(ui: &mut egui::Ui, label: &str, hex: &str, default: HexColor) -> Option<HexColor> {
    let mut rgb = HexColor::parse(hex).unwrap_or(default).to_rgb_array();
    let mut picked = None;

    ui.horizontal(|ui| {
        ui.label(label);
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            picked = Some(HexColor::from_rgb_array(rgb));
        }
        ui.weak(hex);
    });

    picked
}

pub fn ui(ui: &mut egui::Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Colors").strong());
        ui.add_space(ITEM_SPACING);

        if let Some(color) = color_row(ui, "Text Color:", &settings.foreground_color_hex, HexColor::WHITE) {
            settings.set_foreground_color(color);
            changed = true;
        }
        if let Some(color) = color_row(ui, "Background:", &settings.background_color_hex, HexColor::BLACK) {
            settings.set_background_color(color);
            changed = true;
        }

        ui.horizontal(|ui| {
            ui.label("Opacity:");
            if ui
                .add(
                    egui::Slider::new(&mut settings.window_opacity, MIN_OPACITY..=MAX_OPACITY)
                        .step_by(OPACITY_STEP)
                        .show_value(false),
                )
                .changed()
            {
                changed = true;
            }
            ui.label(format!("{:.0}%", settings.window_opacity * 100.0));
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Border").strong());
        ui.add_space(ITEM_SPACING);

        if ui.checkbox(&mut settings.show_border, "Show Border").changed() {
            changed = true;
        }

        if settings.show_border {
            ui.indent("border_settings", |ui| {
                if let Some(color) = color_row(ui, "Border Color:", &settings.border_color_hex, HexColor::WHITE) {
                    settings.set_border_color(color);
                    changed = true;
                }

                ui.horizontal(|ui| {
                    ui.label("Border Width:");
                    if ui
                        .add(
                            egui::Slider::new(&mut settings.border_width, MIN_BORDER_WIDTH..=MAX_BORDER_WIDTH)
                                .step_by(1.0)
                                .suffix(" px"),
                        )
                        .changed()
                    {
                        changed = true;
                    }
                });
            });
        }

        ui.horizontal(|ui| {
            ui.label("Corner Radius:");
            if ui
                .add(
                    egui::Slider::new(&mut settings.corner_radius, MIN_CORNER_RADIUS..=MAX_CORNER_RADIUS)
                        .step_by(CORNER_RADIUS_STEP)
                        .suffix(" px"),
                )
                .changed()
            {
                changed = true;
            }
        });

        if ui.checkbox(&mut settings.show_shadow, "Show Shadow").changed() {
            changed = true;
        }
    });

    changed
}
