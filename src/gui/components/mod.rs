//! Settings window sections

pub mod appearance_settings;
pub mod display_settings;
pub mod font_settings;
pub mod format_settings;
pub mod settings_editor;

pub use settings_editor::SettingsEditorState;
