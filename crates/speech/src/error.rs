use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("preference store error: {0}")]
    Preferences(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
