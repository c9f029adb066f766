use eframe::egui;

use crate::config::Settings;
use crate::fonts;
use crate::gui::constants::*;

/// Installed fonts and the custom-name field
pub struct FontSettingsState {
    available_fonts: Vec<String>,
    font_load_error: Option<String>,
    custom_name: String,
}

impl FontSettingsState {
    pub fn new(current_font: &str) -> Self {
        let (available_fonts, font_load_error) = match fonts::list_fonts() {
            Ok(fonts) => (fonts, None),
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to load font list from fontconfig");
                (vec!["Monospace".to_string()], Some(e.to_string()))
            }
        };

        Self {
            available_fonts,
            font_load_error,
            custom_name: current_font.to_string(),
        }
    }
}

pub fn ui(ui: &mut egui::Ui, settings: &mut Settings, state: &mut FontSettingsState) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Font").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Font:");

            if let Some(ref error) = state.font_load_error {
                ui.colored_label(WARNING_COLOR, "⚠")
                    .on_hover_text(format!("Failed to load fonts: {}", error));
            }

            egui::ComboBox::from_id_salt("clock_font_family")
                .selected_text(&settings.font_name)
                .width(220.0)
                .show_ui(ui, |ui| {
                    for font_name in &state.available_fonts {
                        if ui
                            .selectable_value(&mut settings.font_name, font_name.clone(), font_name)
                            .changed()
                        {
                            state.custom_name = font_name.clone();
                            changed = true;
                        }
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Custom:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.custom_name)
                    .desired_width(220.0)
                    .hint_text("Font name"),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let name = state.custom_name.trim();
            if submitted && !name.is_empty() && name != settings.font_name {
                settings.font_name = name.to_string();
                changed = true;
            }
        });

        ui.label(
            egui::RichText::new("Press Enter to apply. Unknown fonts fall back to monospace.")
                .small()
                .italics(),
        );
    });

    changed
}
