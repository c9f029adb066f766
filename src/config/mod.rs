//! Configuration management for the desktop clock
//!
//! - **settings**: the flat preference record and its field identifiers
//! - **store**: persistence backend and the change-notifying store around it

pub mod settings;
pub mod store;

pub use settings::{SettingField, Settings};
pub use store::{JsonFileBackend, SettingsStore};
