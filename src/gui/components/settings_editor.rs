//! Settings editor component composing all sections of the settings window

use chrono::NaiveDateTime;
use eframe::egui;

use super::display_settings::{self, DisplayAction};
use super::font_settings::{self, FontSettingsState};
use super::format_settings::{self, DatePresets};
use super::appearance_settings;
use crate::config::Settings;
use crate::displays::DisplayInfo;
use crate::gui::constants::{ITEM_SPACING, SECTION_SPACING};

/// Per-window state that outlives a single frame
pub struct SettingsEditorState {
    fonts: FontSettingsState,
    presets: DatePresets,
}

impl SettingsEditorState {
    pub fn new(settings: &Settings, now: NaiveDateTime) -> Self {
        Self {
            fonts: FontSettingsState::new(&settings.font_name),
            presets: DatePresets::new(now),
        }
    }
}

#[derive(Debug, Default)]
pub struct EditorResponse {
    pub changed: bool,
    pub move_to_selected: bool,
}

/// Renders every section against `settings`, a working copy of the stored record
pub fn ui(
    ui: &mut egui::Ui,
    settings: &mut Settings,
    state: &mut SettingsEditorState,
    displays: &[DisplayInfo],
) -> EditorResponse {
    let mut response = EditorResponse::default();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.add_space(ITEM_SPACING);

        let action = display_settings::ui(ui, settings, displays, &mut response.changed);
        response.move_to_selected = action == DisplayAction::MoveToSelected;
        ui.add_space(SECTION_SPACING);

        response.changed |= appearance_settings::ui(ui, settings);
        ui.add_space(SECTION_SPACING);

        response.changed |= font_settings::ui(ui, settings, &mut state.fonts);
        ui.add_space(SECTION_SPACING);

        response.changed |= format_settings::ui(ui, settings, &state.presets);
        ui.add_space(ITEM_SPACING);
    });

    response
}
