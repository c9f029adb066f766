//! Settings store: persisted on every mutation, with typed change notifications
//!
//! The file on disk is a flat JSON object. Loading is lenient per key: a key
//! with the wrong JSON type is replaced by its default rather than failing the
//! whole file, and a file that cannot be parsed at all yields defaults.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, error, info, warn};

use super::settings::{SettingField, Settings};

/// Durable flat key-value storage behind the store
pub trait PreferenceBackend {
    /// Read the stored object. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Map<String, Value>>>;
    fn save(&self, values: &Map<String, Value>) -> Result<()>;
}

/// JSON file in the user's config directory
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

}

impl PreferenceBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Map<String, Value>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {}", self.path.display()))?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            other => anyhow::bail!(
                "Settings file {} holds a JSON {} instead of an object",
                self.path.display(),
                json_type_name(&other)
            ),
        }
    }

    fn save(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(values)
            .context("Failed to serialize settings to JSON")?;

        // Write-then-rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write settings to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to move settings into place at {}", self.path.display()))?;
        Ok(())
    }
}

struct Subscriber {
    fields: Vec<SettingField>,
    sender: Sender<SettingField>,
}

/// Owns the current settings and the backend they persist to
pub struct SettingsStore {
    settings: Settings,
    backend: Box<dyn PreferenceBackend>,
    subscribers: Vec<Subscriber>,
}

impl SettingsStore {
    /// Load from the backend, falling back to defaults on any failure
    pub fn load(backend: Box<dyn PreferenceBackend>) -> Self {
        let settings = match backend.load() {
            Ok(Some(stored)) => {
                let mut settings = settings_from_map(stored);
                settings.validate_and_clamp();
                info!("Loaded clock settings");
                settings
            }
            Ok(None) => {
                info!("No settings stored yet, using defaults");
                Settings::default()
            }
            Err(e) => {
                error!(error = ?e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        Self {
            settings,
            backend,
            subscribers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register interest in specific fields. The receiver gets one message per
    /// changed field per mutation; it is dropped from the list once disconnected.
    pub fn subscribe(&mut self, fields: &[SettingField]) -> Receiver<SettingField> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(Subscriber {
            fields: fields.to_vec(),
            sender,
        });
        receiver
    }

    /// Apply a mutation. If anything changed it is persisted immediately and
    /// subscribers of the changed fields are notified. Returns the changed fields.
    pub fn update(&mut self, mutate: impl FnOnce(&mut Settings)) -> Vec<SettingField> {
        let mut next = self.settings.clone();
        mutate(&mut next);

        let changed = next.changed_fields(&self.settings);
        if changed.is_empty() {
            return changed;
        }

        self.settings = next;
        debug!(fields = ?changed, "Settings changed");
        self.persist();
        self.notify(&changed);
        changed
    }

    /// Record the clock window's frame (position and size)
    pub fn set_frame(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.update(|s| {
            s.x = x;
            s.y = y;
            s.width = width;
            s.height = height;
        });
    }

    fn persist(&self) {
        let values = match serde_json::to_value(&self.settings) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                error!("Settings did not serialize to a JSON object");
                return;
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize settings");
                return;
            }
        };
        if let Err(e) = self.backend.save(&values) {
            error!(error = ?e, "Failed to persist settings");
        }
    }

    fn notify(&mut self, changed: &[SettingField]) {
        self.subscribers.retain(|subscriber| {
            changed
                .iter()
                .filter(|field| subscriber.fields.contains(field))
                .all(|field| subscriber.sender.send(*field).is_ok())
        });
    }
}

/// Overlay stored values onto the defaults, keeping the default for any key
/// whose stored JSON type does not match.
fn settings_from_map(stored: Map<String, Value>) -> Settings {
    let Ok(Value::Object(mut merged)) = serde_json::to_value(Settings::default()) else {
        return Settings::default();
    };

    for (key, value) in stored {
        match merged.get(&key) {
            Some(default) if same_json_type(default, &value) => {
                merged.insert(key, value);
            }
            Some(default) => {
                warn!(
                    key = %key,
                    expected = json_type_name(default),
                    found = json_type_name(&value),
                    "Stored setting has the wrong type, using default"
                );
            }
            None => debug!(key = %key, "Ignoring unknown stored setting"),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
        error!(error = %e, "Failed to rebuild settings from stored values, using defaults");
        Settings::default()
    })
}

fn same_json_type(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::String(_), Value::String(_))
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
