use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use spelldrill_services::ApiConfig;
use spelldrill_speech::{SpeechOptions, Voice};
use spelldrill_tutor::SessionTimings;

/// Settings file for the console front-end. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub timings: SessionTimings,
    pub speech: SpeechOptions,
    /// Voices the console synthesizer offers.
    pub voices: Vec<Voice>,
    pub token: Option<String>,
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("spelldrill").join("config.yaml"))
    }

    /// Load from `path`, or from the default location when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
