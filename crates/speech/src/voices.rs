use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::preferences::VoicePreferenceStore;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voice {
    pub identifier: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub quality: VoiceQuality,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoiceQuality {
    #[default]
    Default,
    Enhanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    /// Clear, friendly voices that suit young learners, best first.
    pub fn preferred_voices(self) -> &'static [&'static str] {
        match self {
            Platform::Ios => &[
                "com.apple.voice.compact.en-US.Samantha",
                "com.apple.ttsbundle.Samantha-compact",
                "com.apple.voice.enhanced.en-US.Samantha",
                "com.apple.ttsbundle.siri_female_en-US_compact",
                "com.apple.voice.compact.en-US.Zoe",
                "com.apple.voice.compact.en-US.Karen",
            ],
            Platform::Android => &[
                "en-us-x-sfg#female_1-local",
                "en-us-x-sfg#female_2-local",
                "en-us-x-tpf-local",
                "en-US-language",
            ],
            Platform::Other => &[],
        }
    }
}

fn is_english(voice: &Voice) -> bool {
    voice.language.starts_with("en")
}

pub fn select_best_voice(voices: &[Voice], platform: Platform) -> Option<String> {
    for preferred in platform.preferred_voices() {
        if let Some(voice) = voices
            .iter()
            .find(|v| v.identifier == *preferred || v.identifier.contains(preferred))
        {
            debug!(name = %voice.name, "selected preferred voice");
            return Some(voice.identifier.clone());
        }
    }
    voices
        .iter()
        .find(|v| is_english(v) && v.quality == VoiceQuality::Enhanced)
        .or_else(|| voices.iter().find(|v| is_english(v)))
        .map(|v| v.identifier.clone())
}

/// A saved voice wins only while it is still installed on the device.
pub fn resolve_voice(
    store: &dyn VoicePreferenceStore,
    voices: &[Voice],
    platform: Platform,
) -> Option<String> {
    match store.selected_voice() {
        Ok(Some(saved)) if voices.iter().any(|v| v.identifier == saved) => {
            info!(voice = %saved, "loaded saved voice");
            Some(saved)
        }
        Ok(_) => select_best_voice(voices, platform),
        Err(err) => {
            debug!(%err, "voice preference unavailable");
            select_best_voice(voices, platform)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferenceStore;

    fn voice(identifier: &str, language: &str, quality: VoiceQuality) -> Voice {
        Voice {
            identifier: identifier.to_string(),
            name: identifier.to_string(),
            language: language.to_string(),
            quality,
        }
    }

    #[test]
    fn prefers_platform_voices() {
        let voices = vec![
            voice("fr-voice", "fr-FR", VoiceQuality::Enhanced),
            voice("com.apple.voice.compact.en-US.Zoe", "en-US", VoiceQuality::Default),
        ];
        assert_eq!(
            select_best_voice(&voices, Platform::Ios).as_deref(),
            Some("com.apple.voice.compact.en-US.Zoe")
        );
    }

    #[test]
    fn falls_back_to_enhanced_then_any_english() {
        let voices = vec![
            voice("plain", "en-GB", VoiceQuality::Default),
            voice("rich", "en-AU", VoiceQuality::Enhanced),
        ];
        assert_eq!(select_best_voice(&voices, Platform::Other).as_deref(), Some("rich"));
        let plain_only = vec![voice("plain", "en-GB", VoiceQuality::Default)];
        assert_eq!(
            select_best_voice(&plain_only, Platform::Android).as_deref(),
            Some("plain")
        );
        assert!(select_best_voice(&[], Platform::Ios).is_none());
    }

    #[test]
    fn saved_voice_must_still_exist() {
        let store = MemoryPreferenceStore::default();
        let voices = vec![voice("a", "en-US", VoiceQuality::Default)];
        store.set_selected_voice("gone").unwrap();
        assert_eq!(resolve_voice(&store, &voices, Platform::Other).as_deref(), Some("a"));
        store.set_selected_voice("a").unwrap();
        assert_eq!(resolve_voice(&store, &voices, Platform::Other).as_deref(), Some("a"));
    }
}
