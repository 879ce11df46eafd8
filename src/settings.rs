//! Persistent key/value settings backing the control properties.
//!
//! Values are stored as raw strings and coerced by the properties layer,
//! so a store written by an older build still loads.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bevy::log::{debug, warn};
use bevy::prelude::Resource;
use directories::ProjectDirs;

use crate::error::{ControlError, Result};
use crate::types::Properties;

pub const SETTINGS_FILENAME: &str = "control_settings.json";

pub trait SettingsProvider: Send + Sync {
    fn get_value(&self, key: &str) -> Option<String>;
    fn set_value(&mut self, key: &str, value: String);
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl SettingsProvider for MemorySettings {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Settings persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonSettingsStore {
    /// Default location under the platform config dir.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "map-rs", "map-editor").ok_or(ControlError::NoSettingsDir)?;
        Ok(dirs.config_dir().join(SETTINGS_FILENAME))
    }

    /// Loads the store, treating a missing file as empty.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!("No settings file at {:?}", path);
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let values = serde_json::from_str(&content)?;
        debug!("Loaded settings from {:?}", path);
        Ok(Self { path, values })
    }

    /// Like `load`, but a broken file gives an empty store instead of an error.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Failed to load settings from {:?}: {}", path, e);
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes to a temp file first and renames it over the old one.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(|e| ControlError::SettingsWrite {
            path: temp_path.clone(),
            message: e.to_string(),
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| ControlError::SettingsWrite {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

impl SettingsProvider for JsonSettingsStore {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Shared settings handle living in the app.
#[derive(Resource, Clone)]
pub struct SettingsStore {
    pub inner: Arc<Mutex<JsonSettingsStore>>,
}

impl SettingsStore {
    pub fn new(store: JsonSettingsStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Writes every property back and saves the file.
    pub fn persist(&self, properties: &Properties) -> Result<()> {
        let mut store = match self.inner.lock() {
            Ok(store) => store,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (key, value) in properties {
            store.set_value(key, value.to_persisted());
        }
        store.save()
    }
}

impl SettingsProvider for SettingsStore {
    fn get_value(&self, key: &str) -> Option<String> {
        self.inner.lock().ok().and_then(|store| store.get_value(key))
    }

    fn set_value(&mut self, key: &str, value: String) {
        if let Ok(mut store) = self.inner.lock() {
            store.set_value(key, value);
        }
    }
}
