use eframe::egui;

use crate::config::Settings;
use crate::displays::DisplayInfo;
use crate::gui::constants::*;

const CURRENT_DISPLAY: &str = "Current Display";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayAction {
    None,
    MoveToSelected,
}

/// Label for the stored selection, which may name a display that is unplugged
fn selection_label<'a>(selected: &'a str, displays: &'a [DisplayInfo]) -> &'a str {
    if selected.is_empty() {
        return CURRENT_DISPLAY;
    }
    displays
        .iter()
        .find(|display| display.id == selected)
        .map_or(selected, |display| display.display_name())
}

pub fn ui(ui: &mut egui::Ui, settings: &mut Settings, displays: &[DisplayInfo], changed: &mut bool) -> DisplayAction {
    let mut action = DisplayAction::None;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Display").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Target Display:");
            egui::ComboBox::from_id_salt("target_display")
                .selected_text(selection_label(&settings.selected_display_id, displays))
                .width(200.0)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_value(&mut settings.selected_display_id, String::new(), CURRENT_DISPLAY)
                        .changed()
                    {
                        *changed = true;
                    }
                    for display in displays {
                        if ui
                            .selectable_value(
                                &mut settings.selected_display_id,
                                display.id.clone(),
                                display.display_name(),
                            )
                            .changed()
                        {
                            *changed = true;
                        }
                    }
                });
        });

        ui.add_space(ITEM_SPACING / 2.0);

        ui.add_enabled_ui(!displays.is_empty(), |ui| {
            if ui.button("Move Clock to Selected Display").clicked() {
                action = DisplayAction::MoveToSelected;
            }
        });
        if displays.is_empty() {
            ui.label(egui::RichText::new("(No displays detected)").small().italics());
        }
    });

    action
}
