use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use spelldrill_domain::{CompletedResults, DomainError, Session, SessionResults, Task};
use spelldrill_services::PracticeApi;
use spelldrill_speech::{ListeningSession, RecognitionError, SpeechDevices};

use crate::analytics::SessionAnalytics;
use crate::error::PracticeError;
use crate::observer::{PracticeObserver, SilentObserver};
use crate::reveal::RevealSequence;
use crate::scoring::normalize_spoken;
use crate::session::{Answer, Effect, InputChannel, Outcome, PracticeSession, Prompt, Transition};
use crate::timings::SessionTimings;

/// What the learner did at a typed prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnerAction {
    Answer(String),
    RepeatWord,
    Leave,
}

#[async_trait]
pub trait TypedInput: Send {
    async fn next_action(&mut self, prompt: &Prompt) -> LearnerAction;
}

/// Plays back a fixed list of actions, then leaves.
#[derive(Debug, Default)]
pub struct ScriptedTypedInput {
    actions: VecDeque<LearnerAction>,
}

impl ScriptedTypedInput {
    pub fn new<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = LearnerAction>,
    {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(answers.into_iter().map(|a| LearnerAction::Answer(a.into())))
    }
}

#[async_trait]
impl TypedInput for ScriptedTypedInput {
    async fn next_action(&mut self, _prompt: &Prompt) -> LearnerAction {
        self.actions.pop_front().unwrap_or(LearnerAction::Leave)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub session: Session,
    /// Counts kept on this device.
    pub local: SessionResults,
    /// The backend's verdict.
    pub reported: CompletedResults,
}

impl SessionReport {
    pub fn analytics(&self) -> SessionAnalytics {
        SessionAnalytics::new(self.reported.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    Completed(SessionReport),
    /// The learner left before the last word; nothing was reported.
    Abandoned { results: SessionResults },
}

/// Drives a `PracticeSession` against real collaborators.
pub struct PracticeRunner {
    api: Arc<dyn PracticeApi>,
    devices: SpeechDevices,
    task: Task,
    typed: Box<dyn TypedInput>,
    observer: Box<dyn PracticeObserver>,
    timings: SessionTimings,
}

impl PracticeRunner {
    pub fn new(api: Arc<dyn PracticeApi>, devices: SpeechDevices, task: Task) -> Self {
        Self {
            api,
            devices,
            task,
            typed: Box::new(ScriptedTypedInput::default()),
            observer: Box::new(SilentObserver),
            timings: SessionTimings::default(),
        }
    }

    pub fn with_typed_input(mut self, typed: Box<dyn TypedInput>) -> Self {
        self.typed = typed;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn PracticeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_timings(mut self, timings: SessionTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Run the session to completion or abandonment. Speech devices are
    /// released on every exit path.
    #[instrument(skip_all, fields(assignment = %self.task.assignment_id))]
    pub async fn run(mut self) -> Result<SessionEnd, PracticeError> {
        let outcome = self.drive().await;
        self.devices.release().await;
        outcome
    }

    async fn drive(&mut self) -> Result<SessionEnd, PracticeError> {
        let started = self
            .api
            .start_session(&self.task.assignment_id)
            .await
            .map_err(PracticeError::Bootstrap)?;
        for word in &started.words {
            word.validate()?;
            if self.task.voice_enabled() && normalize_spoken(&word.word_text).is_empty() {
                return Err(DomainError::validation(format!(
                    "word {} has no letters to spell aloud",
                    word.id
                ))
                .into());
            }
        }
        let mut session = PracticeSession::new(started.session, started.words, &self.task);
        info!(
            session = %session.session().id,
            words = session.word_count(),
            task_type = ?self.task.task_type,
            mode = self.task.test_input_mode.label(),
            "practice session started"
        );
        let mut listening = self.devices.listening_session();
        let mut pending = VecDeque::new();
        let begin = session.begin();
        self.observe(&session, &begin);
        pending.extend(begin.effects);

        loop {
            while let Some(effect) = pending.pop_front() {
                match effect {
                    Effect::Speak(text) => self.devices.speak(&text).await,
                    Effect::PlayDing => self.devices.ding().await,
                    Effect::Submit(record) => {
                        let id = &session.session().id;
                        if let Err(err) = self.api.submit_attempt(id, &record, None).await {
                            warn!(%err, session = %id, word = %record.word_id, "attempt not recorded");
                        }
                    }
                    Effect::Reveal(text) => {
                        let mut sequence = RevealSequence::new(&text, self.timings.reveal_pacing());
                        let observer = &mut self.observer;
                        sequence.play(|frame| observer.letter_revealed(frame)).await;
                        self.observer.reveal_finished();
                        let next = session.reveal_finished();
                        self.observe(&session, &next);
                        prepend(&mut pending, next);
                    }
                    Effect::ListenAgain => tokio::time::sleep(self.timings.relisten_delay()).await,
                    Effect::AdvanceLater => {
                        tokio::time::sleep(self.timings.advance_delay()).await;
                        let next = session.advance();
                        self.observe(&session, &next);
                        prepend(&mut pending, next);
                    }
                    Effect::Complete(results) => {
                        listening.stop().await;
                        return self.complete(session.session().clone(), results).await;
                    }
                    Effect::Notice(message) => self.observer.notice(&message),
                }
            }

            let Some(prompt) = session.prompt() else {
                warn!(stage = ?session.stage(), "no input expected and nothing pending");
                return Ok(abandon(&session, &mut listening).await);
            };
            self.observer.prompt(&prompt);
            let answer = match prompt.channel {
                InputChannel::Typing => match self.typed.next_action(&prompt).await {
                    LearnerAction::Answer(text) => Answer::Typed(text),
                    LearnerAction::RepeatWord => {
                        if let Some(word) = session.current_word() {
                            self.devices.speak(&word.word_text).await;
                        }
                        continue;
                    }
                    LearnerAction::Leave => return Ok(abandon(&session, &mut listening).await),
                },
                InputChannel::Voice => match listening.listen().await {
                    Ok(transcript) => Answer::Spoken(transcript),
                    Err(RecognitionError::Cancelled) => {
                        return Ok(abandon(&session, &mut listening).await)
                    }
                    Err(err) => {
                        self.observer.alert(err.title(), &err.to_string());
                        tokio::time::sleep(self.timings.relisten_delay()).await;
                        continue;
                    }
                },
            };
            let transition = session.submit(answer);
            self.observe(&session, &transition);
            let rejected = transition.outcome == Outcome::Rejected;
            pending.extend(transition.effects);
            if rejected && prompt.channel == InputChannel::Voice {
                pending.push_back(Effect::ListenAgain);
            }
        }
    }

    async fn complete(
        &mut self,
        session: Session,
        local: SessionResults,
    ) -> Result<SessionEnd, PracticeError> {
        let reported = self
            .api
            .complete_session(&session.id, &local)
            .await
            .map_err(PracticeError::Completion)?;
        info!(
            session = %session.id,
            correct = local.correct,
            total = local.total,
            accuracy = reported.accuracy_percentage,
            "practice session completed"
        );
        Ok(SessionEnd::Completed(SessionReport {
            session,
            local,
            reported,
        }))
    }

    fn observe(&mut self, session: &PracticeSession, transition: &Transition) {
        debug!(outcome = ?transition.outcome, effects = transition.effects.len(), "transition");
        match transition.outcome {
            Outcome::Ignored => return,
            Outcome::Started | Outcome::Advanced { .. } => {
                if let Some(word) = session.current_word() {
                    self.observer
                        .word_started(word, session.position(), session.word_count());
                }
            }
            _ => {}
        }
        self.observer.outcome(&transition.outcome);
        let results = session.results();
        self.observer.score(results.correct, results.total);
    }
}

fn prepend(pending: &mut VecDeque<Effect>, transition: Transition) {
    for effect in transition.effects.into_iter().rev() {
        pending.push_front(effect);
    }
}

async fn abandon(session: &PracticeSession, listening: &mut ListeningSession) -> SessionEnd {
    listening.stop().await;
    let results = session.results().clone();
    info!(
        session = %session.session().id,
        position = session.position(),
        "practice session abandoned"
    );
    SessionEnd::Abandoned { results }
}
