use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a recognition attempt produced no transcript.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("No speech detected. Please speak clearly and try again.")]
    NoSpeech,
    #[error("Microphone error. Please check your device settings.")]
    AudioCapture,
    #[error("Microphone permission denied. Please enable it in Settings.")]
    PermissionDenied,
    #[error("Network error. Please check your internet connection.")]
    Network,
    #[error("Voice recognition was stopped.")]
    Cancelled,
    #[error("Voice recognition error: {0}")]
    Other(String),
}

impl RecognitionError {
    /// Map a raw platform error code or message onto a cause.
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("no-speech") || lowered.contains("no speech") {
            Self::NoSpeech
        } else if lowered.contains("audio-capture") || lowered.contains("audio capture") {
            Self::AudioCapture
        } else if lowered.contains("not-allowed") || lowered.contains("permission") {
            Self::PermissionDenied
        } else if lowered.contains("network") {
            Self::Network
        } else if lowered.contains("aborted") {
            Self::Cancelled
        } else if raw.trim().is_empty() {
            Self::Other("Voice recognition failed. Please try again.".to_string())
        } else {
            Self::Other(raw.trim().to_string())
        }
    }

    pub fn title(&self) -> &'static str {
        "Voice Recognition Error"
    }
}

/// Device speech recognition. Each `listen` yields exactly one outcome.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen(&self) -> Result<String, RecognitionError>;

    async fn stop(&self);

    /// Tear down listeners; the recognizer is not used after this.
    async fn release(&self) {
        self.stop().await;
    }
}

/// Guarantees at most one recognition in flight for a session.
pub struct ListeningSession {
    recognizer: Arc<dyn SpeechRecognizer>,
    listening: bool,
}

impl ListeningSession {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub async fn listen(&mut self) -> Result<String, RecognitionError> {
        if self.listening {
            debug!("stopping previous recognition before listening again");
            self.recognizer.stop().await;
        }
        self.listening = true;
        let outcome = self.recognizer.listen().await;
        self.listening = false;
        if let Err(err) = &outcome {
            warn!(%err, "recognition failed");
        }
        outcome
    }

    pub async fn stop(&mut self) {
        if self.listening {
            self.recognizer.stop().await;
        }
        self.listening = false;
    }
}

/// Replays a fixed list of outcomes; an exhausted script reports `Cancelled`.
#[derive(Default)]
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Result<String, RecognitionError>>>,
    listens: Mutex<usize>,
    released: Mutex<bool>,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_outcomes(transcripts.into_iter().map(|t| Ok(t.into())))
    }

    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<String, RecognitionError>>,
    {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn listen_count(&self) -> usize {
        self.listens.lock().map(|n| *n).unwrap_or_default()
    }

    pub fn is_released(&self) -> bool {
        self.released.lock().map(|r| *r).unwrap_or_default()
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn listen(&self) -> Result<String, RecognitionError> {
        if let Ok(mut count) = self.listens.lock() {
            *count += 1;
        }
        self.script
            .lock()
            .map_err(|err| RecognitionError::Other(err.to_string()))?
            .pop_front()
            .unwrap_or(Err(RecognitionError::Cancelled))
    }

    async fn stop(&self) {}

    async fn release(&self) {
        if let Ok(mut released) = self.released.lock() {
            *released = true;
        }
    }
}
