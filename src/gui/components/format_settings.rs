use chrono::NaiveDateTime;
use eframe::egui;

use crate::clock::{DATE_PRESETS, Formatter};
use crate::config::Settings;
use crate::gui::constants::*;

/// Date presets with a sample rendering for the picker
pub struct DatePresets {
    entries: Vec<(&'static str, String)>,
}

impl DatePresets {
    pub fn new(sample_at: NaiveDateTime) -> Self {
        let entries = DATE_PRESETS
            .iter()
            .map(|&pattern| (pattern, Formatter::new(pattern, false).format(&sample_at)))
            .collect();
        Self { entries }
    }

    pub fn sample(&self, pattern: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(preset, _)| *preset == pattern)
            .map(|(_, sample)| sample.as_str())
    }
}

pub fn ui(ui: &mut egui::Ui, settings: &mut Settings, presets: &DatePresets) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Time Format").strong());
        ui.add_space(ITEM_SPACING);

        changed |= ui.checkbox(&mut settings.use_24_hour, "24-Hour Time").changed();
        changed |= ui.checkbox(&mut settings.show_seconds, "Show Seconds").changed();

        if !settings.use_24_hour {
            changed |= ui.checkbox(&mut settings.show_am_pm, "Show AM/PM").changed();
            if settings.show_am_pm {
                ui.indent("am_pm_case", |ui| {
                    changed |= ui.checkbox(&mut settings.uppercase_am_pm, "Uppercase AM/PM").changed();
                });
            }
        }

        ui.add_space(ITEM_SPACING);
        changed |= ui.checkbox(&mut settings.show_date, "Show Date").changed();

        if settings.show_date {
            ui.horizontal(|ui| {
                ui.label("Date Format:");
                let selected = presets
                    .sample(&settings.date_format)
                    .unwrap_or(&settings.date_format)
                    .to_string();
                egui::ComboBox::from_id_salt("date_format")
                    .selected_text(selected)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for (pattern, sample) in &presets.entries {
                            if ui
                                .selectable_value(&mut settings.date_format, pattern.to_string(), sample)
                                .on_hover_text(*pattern)
                                .changed()
                            {
                                changed = true;
                            }
                        }
                    });
            });
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Effects").strong());
        ui.add_space(ITEM_SPACING);

        changed |= ui
            .checkbox(&mut settings.animation_enabled, "Pulse Animation")
            .on_hover_text("Briefly scales the clock on each second")
            .changed();
    });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_preset_samples() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let presets = DatePresets::new(at);

        assert_eq!(presets.sample("EEEE, MMMM d"), Some("Saturday, March 9"));
        assert_eq!(presets.sample("dd/MM/yyyy"), Some("09/03/2024"));
        assert_eq!(presets.sample("QQQ"), None);
    }
}
