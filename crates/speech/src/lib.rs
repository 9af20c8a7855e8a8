pub mod cue;
pub mod devices;
pub mod error;
pub mod preferences;
pub mod recognition;
pub mod tts;
pub mod voices;

pub use cue::{CountingCue, FeedbackCue};
pub use devices::SpeechDevices;
pub use error::SpeechError;
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, VoicePreferenceStore};
pub use recognition::{ListeningSession, RecognitionError, ScriptedRecognizer, SpeechRecognizer};
pub use tts::{RecordingSpeaker, Speaker, SpeechOptions};
pub use voices::{resolve_voice, select_best_voice, Platform, Voice, VoiceQuality};
