use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::SpeechError;

/// The short "ding" played after a wrong answer.
#[async_trait]
pub trait FeedbackCue: Send + Sync {
    async fn play(&self) -> Result<(), SpeechError>;

    /// Free the loaded sound.
    async fn unload(&self) {}
}

#[derive(Default)]
pub struct CountingCue {
    plays: AtomicUsize,
    unloaded: AtomicBool,
}

impl CountingCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackCue for CountingCue {
    async fn play(&self) -> Result<(), SpeechError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unload(&self) {
        self.unloaded.store(true, Ordering::SeqCst);
    }
}
