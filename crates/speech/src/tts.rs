use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::SpeechError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechOptions {
    pub rate: f32,
    pub pitch: f32,
    pub language: String,
    /// Platform voice identifier; `None` uses the device default.
    pub voice: Option<String>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: 0.85,
            pitch: 1.0,
            language: "en-US".to_string(),
            voice: None,
        }
    }
}

impl SpeechOptions {
    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }
}

/// Device text-to-speech.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<(), SpeechError>;

    /// Interrupt any utterance in progress.
    async fn stop(&self) -> Result<(), SpeechError>;
}

/// Keeps every utterance; used to check what a session pronounced.
#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
    stops: Mutex<usize>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.lock().map(|s| *s).unwrap_or_default()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str, _options: &SpeechOptions) -> Result<(), SpeechError> {
        self.spoken
            .lock()
            .map_err(|err| SpeechError::Synthesis(err.to_string()))?
            .push(text.to_string());
        Ok(())
    }

    async fn stop(&self) -> Result<(), SpeechError> {
        *self
            .stops
            .lock()
            .map_err(|err| SpeechError::Synthesis(err.to_string()))? += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_classroom_pacing() {
        let options = SpeechOptions::default();
        assert_eq!(options.rate, 0.85);
        assert_eq!(options.language, "en-US");
        assert!(options.voice.is_none());
    }

    #[tokio::test]
    async fn recording_speaker_keeps_order() {
        let speaker = RecordingSpeaker::new();
        let options = SpeechOptions::default();
        speaker.speak("cat", &options).await.unwrap();
        speaker.speak("dog", &options).await.unwrap();
        speaker.stop().await.unwrap();
        assert_eq!(speaker.spoken(), vec!["cat", "dog"]);
        assert_eq!(speaker.stop_count(), 1);
    }
}
