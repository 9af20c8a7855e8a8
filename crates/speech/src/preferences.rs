use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::SpeechError;

pub const SELECTED_VOICE_KEY: &str = "selected_voice";

/// Small persisted key/value store holding the learner's voice choice.
pub trait VoicePreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SpeechError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SpeechError>;
    fn remove(&self, key: &str) -> Result<(), SpeechError>;

    fn selected_voice(&self) -> Result<Option<String>, SpeechError> {
        self.get(SELECTED_VOICE_KEY)
    }

    fn set_selected_voice(&self, identifier: &str) -> Result<(), SpeechError> {
        self.set(SELECTED_VOICE_KEY, identifier)
    }

    fn clear_selected_voice(&self) -> Result<(), SpeechError> {
        self.remove(SELECTED_VOICE_KEY)
    }
}

#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, SpeechError> {
        self.values
            .lock()
            .map_err(|err| SpeechError::Preferences(err.to_string()))
    }
}

impl VoicePreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, SpeechError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SpeechError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SpeechError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/spelldrill/preferences.json`.
    pub fn default_location() -> Option<Self> {
        let base = dirs::config_dir()?;
        Some(Self::new(base.join("spelldrill").join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SpeechError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), SpeechError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)?;
        debug!(path = ?self.path, "saved preferences");
        Ok(())
    }
}

impl VoicePreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, SpeechError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SpeechError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SpeechError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}
