use std::sync::Arc;

use tracing::{debug, warn};

use crate::cue::FeedbackCue;
use crate::recognition::{ListeningSession, SpeechRecognizer};
use crate::tts::{Speaker, SpeechOptions};

/// The speech capabilities one practice session holds until it ends.
pub struct SpeechDevices {
    speaker: Arc<dyn Speaker>,
    recognizer: Arc<dyn SpeechRecognizer>,
    cue: Arc<dyn FeedbackCue>,
    options: SpeechOptions,
}

impl SpeechDevices {
    pub fn acquire(
        speaker: Arc<dyn Speaker>,
        recognizer: Arc<dyn SpeechRecognizer>,
        cue: Arc<dyn FeedbackCue>,
        options: SpeechOptions,
    ) -> Self {
        debug!(voice = ?options.voice, "acquired speech devices");
        Self {
            speaker,
            recognizer,
            cue,
            options,
        }
    }

    pub fn options(&self) -> &SpeechOptions {
        &self.options
    }

    pub fn listening_session(&self) -> ListeningSession {
        ListeningSession::new(self.recognizer.clone())
    }

    pub async fn speak(&self, text: &str) {
        if let Err(err) = self.speaker.speak(text, &self.options).await {
            warn!(%err, text, "failed to speak");
        }
    }

    pub async fn ding(&self) {
        if let Err(err) = self.cue.play().await {
            warn!(%err, "failed to play feedback cue");
        }
    }

    /// Stop speech, tear down recognition and unload the cue.
    pub async fn release(self) {
        if let Err(err) = self.speaker.stop().await {
            warn!(%err, "failed to stop speech");
        }
        self.recognizer.release().await;
        self.cue.unload().await;
        debug!("released speech devices");
    }
}
