pub mod aggregator;
pub mod analytics;
pub mod attempts;
pub mod error;
pub mod observer;
pub mod protocol;
pub mod queue;
pub mod reveal;
pub mod runner;
pub mod scoring;
pub mod session;
pub mod timings;

pub use aggregator::SessionAggregator;
pub use analytics::{local_accuracy, AccuracyTier, SessionAnalytics};
pub use attempts::{AttemptTracker, RetryDecision};
pub use error::PracticeError;
pub use observer::{PracticeObserver, SilentObserver};
pub use protocol::{InputProtocol, Phase, PhaseStep};
pub use queue::{QueueStep, WordQueue};
pub use reveal::{RevealFrame, RevealPacing, RevealPolicy, RevealSequence};
pub use runner::{
    LearnerAction, PracticeRunner, ScriptedTypedInput, SessionEnd, SessionReport, TypedInput,
};
pub use scoring::{normalize_spoken, normalize_typed, SpellingChecker, Verdict};
pub use session::{
    Answer, Effect, InputChannel, Outcome, PracticeSession, Prompt, Stage, Transition,
};
pub use timings::SessionTimings;
