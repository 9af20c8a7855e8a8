use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use spelldrill_domain::{
    AttemptRecord, InputMethod, Session, SessionResults, Task, TaskType, Word,
};

use crate::aggregator::SessionAggregator;
use crate::attempts::{AttemptTracker, RetryDecision};
use crate::protocol::{InputProtocol, Phase, PhaseStep};
use crate::queue::{QueueStep, WordQueue};
use crate::reveal::RevealPolicy;
use crate::scoring::{SpellingChecker, Verdict};

pub const EMPTY_ANSWER_NOTICE: &str = "Please enter your spelling";
pub const NO_SPEECH_NOTICE: &str = "No speech detected. Please speak clearly and try again.";

/// One submission from the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Typed(String),
    Spoken(String),
}

impl Answer {
    pub fn method(&self) -> InputMethod {
        match self {
            Answer::Typed(_) => InputMethod::Typing,
            Answer::Spoken(_) => InputMethod::Voice,
        }
    }
}

/// Side effects the driver performs, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Speak(String),
    PlayDing,
    Submit(AttemptRecord),
    /// Play the letter-by-letter reveal, then call `reveal_finished`.
    Reveal(String),
    /// Pause, then listen for the next utterance.
    ListenAgain,
    /// Pause, then call `advance`.
    AdvanceLater,
    Complete(SessionResults),
    Notice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Rejected,
    Started,
    PhaseMatched(Phase),
    Correct,
    Retry { attempt: u32 },
    Missed,
    RevealDone,
    Repeated,
    RepeatMismatch,
    Advanced { index: usize },
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(outcome: Outcome, effects: Vec<Effect>) -> Self {
        Self { outcome, effects }
    }

    fn ignored() -> Self {
        Self::new(Outcome::Ignored, Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterReveal {
    Retry,
    MustRepeat,
}

/// All per-word transient state, replaced as a whole on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordState {
    Pending,
    Answering {
        attempts: AttemptTracker,
        protocol: InputProtocol,
    },
    Revealing {
        attempts: AttemptTracker,
        then: AfterReveal,
    },
    MustRepeat,
    Resolved,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Answering,
    Revealing,
    MustRepeat,
    Resolved,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputChannel {
    Typing,
    Voice,
}

/// What the learner is being asked for right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub channel: InputChannel,
    pub instruction: &'static str,
    pub position: usize,
    pub total: usize,
    pub attempt: u32,
    pub max_attempts: u32,
    pub must_repeat: bool,
}

/// The practice-session state machine. Pure: every call returns the effects
/// the driver must perform.
#[derive(Debug)]
pub struct PracticeSession {
    session: Session,
    task_type: TaskType,
    sound_enabled: bool,
    template: InputProtocol,
    queue: WordQueue,
    aggregator: Option<SessionAggregator>,
    final_results: SessionResults,
    state: WordState,
    checker: SpellingChecker,
}

impl PracticeSession {
    pub fn new(session: Session, words: Vec<Word>, task: &Task) -> Self {
        Self {
            session,
            task_type: task.task_type,
            sound_enabled: task.sound_enabled,
            template: InputProtocol::for_mode(task.test_input_mode),
            queue: WordQueue::new(words),
            aggregator: Some(SessionAggregator::new()),
            final_results: SessionResults::default(),
            state: WordState::Pending,
            checker: SpellingChecker,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.queue.current()
    }

    pub fn position(&self) -> usize {
        self.queue.position()
    }

    pub fn word_count(&self) -> usize {
        self.queue.len()
    }

    pub fn progress(&self) -> f32 {
        self.queue.progress()
    }

    pub fn max_attempts(&self) -> u32 {
        self.task_type.max_attempts()
    }

    /// Attempt number for the current word, in `1..=max_attempts`.
    pub fn attempt_number(&self) -> u32 {
        match self.state {
            WordState::Answering { attempts, .. } | WordState::Revealing { attempts, .. } => {
                attempts.current()
            }
            WordState::MustRepeat => self.max_attempts(),
            _ => 1,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self.state {
            WordState::Answering { protocol, .. } => protocol.phase(),
            _ => None,
        }
    }

    pub fn stage(&self) -> Stage {
        match self.state {
            WordState::Pending => Stage::Pending,
            WordState::Answering { .. } => Stage::Answering,
            WordState::Revealing { .. } => Stage::Revealing,
            WordState::MustRepeat => Stage::MustRepeat,
            WordState::Resolved => Stage::Resolved,
            WordState::Finished => Stage::Finished,
        }
    }

    pub fn results(&self) -> &SessionResults {
        match &self.aggregator {
            Some(aggregator) => aggregator.snapshot(),
            None => &self.final_results,
        }
    }

    /// Input the session is waiting for, or `None` while input is closed.
    pub fn prompt(&self) -> Option<Prompt> {
        let (channel, instruction, must_repeat) = match self.state {
            WordState::Answering { protocol, .. } => {
                let channel = match protocol {
                    InputProtocol::Typed => InputChannel::Typing,
                    _ => InputChannel::Voice,
                };
                (channel, protocol.instruction(), false)
            }
            WordState::MustRepeat => (
                self.repeat_channel(),
                "Spell the word correctly to continue",
                true,
            ),
            _ => return None,
        };
        Some(Prompt {
            channel,
            instruction,
            position: self.queue.position(),
            total: self.queue.len(),
            attempt: self.attempt_number(),
            max_attempts: self.max_attempts(),
            must_repeat,
        })
    }

    fn repeat_channel(&self) -> InputChannel {
        match self.template {
            InputProtocol::Typed => InputChannel::Typing,
            _ => InputChannel::Voice,
        }
    }

    /// Pronounce the first word, or complete straight away for an empty list.
    pub fn begin(&mut self) -> Transition {
        if self.state != WordState::Pending {
            return Transition::ignored();
        }
        match self.queue.current() {
            Some(word) => {
                let text = word.word_text.clone();
                self.state = self.fresh_word_state();
                Transition::new(Outcome::Started, vec![Effect::Speak(text)])
            }
            None => self.advance_queue(),
        }
    }

    pub fn submit(&mut self, answer: Answer) -> Transition {
        let Some(word) = self.queue.current() else {
            return Transition::ignored();
        };
        let word = word.clone();
        match mem::replace(&mut self.state, WordState::Resolved) {
            WordState::Answering { attempts, protocol } => {
                self.answer(&word, attempts, protocol, answer)
            }
            WordState::MustRepeat => self.repeat(&word, answer),
            other => {
                self.state = other;
                debug!(?answer, "input closed, answer ignored");
                Transition::ignored()
            }
        }
    }

    fn answer(
        &mut self,
        word: &Word,
        attempts: AttemptTracker,
        protocol: InputProtocol,
        answer: Answer,
    ) -> Transition {
        let accepted = matches!(
            (protocol, &answer),
            (InputProtocol::Typed, Answer::Typed(_))
                | (
                    InputProtocol::Spoken | InputProtocol::SaySpellSay(_),
                    Answer::Spoken(_)
                )
        );
        if !accepted {
            self.state = WordState::Answering { attempts, protocol };
            return Transition::ignored();
        }
        let verdict = match self.judge(word, &answer) {
            Ok(verdict) => verdict,
            Err(notice) => {
                self.state = WordState::Answering { attempts, protocol };
                return Transition::new(Outcome::Rejected, vec![Effect::Notice(notice.into())]);
            }
        };
        let method = answer.method();
        match protocol {
            InputProtocol::SaySpellSay(phase) => match phase.on_input(verdict.matched) {
                PhaseStep::Continue(next) => {
                    self.state = WordState::Answering {
                        attempts,
                        protocol: InputProtocol::SaySpellSay(next),
                    };
                    Transition::new(Outcome::PhaseMatched(next), vec![Effect::ListenAgain])
                }
                PhaseStep::Complete => self.correct(word, verdict, method),
                PhaseStep::Miss => self.miss(word, attempts, verdict, method),
            },
            _ if verdict.matched => self.correct(word, verdict, method),
            _ => self.miss(word, attempts, verdict, method),
        }
    }

    /// Blank answers are not attempts.
    fn judge(&self, word: &Word, answer: &Answer) -> Result<Verdict, &'static str> {
        let verdict = match answer {
            Answer::Typed(text) => self.checker.check_typed(&word.word_text, text),
            Answer::Spoken(text) => self.checker.check_spoken(&word.word_text, text),
        };
        if !verdict.normalized.is_empty() {
            return Ok(verdict);
        }
        Err(match answer {
            Answer::Typed(_) => EMPTY_ANSWER_NOTICE,
            Answer::Spoken(_) => NO_SPEECH_NOTICE,
        })
    }

    fn record(
        &mut self,
        word: &Word,
        verdict: Verdict,
        method: InputMethod,
        correct: bool,
    ) -> Effect {
        let record = AttemptRecord {
            word_id: word.id.clone(),
            user_input: verdict.normalized,
            input_method: method,
            is_correct: correct,
        };
        if let Some(aggregator) = self.aggregator.as_mut() {
            aggregator.record_attempt(record.clone());
            if correct {
                aggregator.record_correct();
            }
        }
        Effect::Submit(record)
    }

    fn correct(&mut self, word: &Word, verdict: Verdict, method: InputMethod) -> Transition {
        let submit = self.record(word, verdict, method, true);
        self.state = WordState::Resolved;
        Transition::new(Outcome::Correct, vec![submit, Effect::AdvanceLater])
    }

    fn miss(
        &mut self,
        word: &Word,
        mut attempts: AttemptTracker,
        verdict: Verdict,
        method: InputMethod,
    ) -> Transition {
        let mut effects = Vec::new();
        if self.sound_enabled {
            effects.push(Effect::PlayDing);
        }
        effects.push(self.record(word, verdict, method, false));
        let text = word.word_text.clone();
        match attempts.register_miss() {
            RetryDecision::Retry { attempt } => {
                if RevealPolicy::permits(self.task_type) {
                    effects.push(Effect::Reveal(text.clone()));
                    self.state = WordState::Revealing {
                        attempts,
                        then: AfterReveal::Retry,
                    };
                } else {
                    self.state = WordState::Answering {
                        attempts,
                        protocol: self.template.fresh(),
                    };
                }
                effects.push(Effect::Speak(text));
                Transition::new(Outcome::Retry { attempt }, effects)
            }
            RetryDecision::Exhausted => {
                if let Some(aggregator) = self.aggregator.as_mut() {
                    aggregator.record_incorrect();
                }
                if RevealPolicy::permits(self.task_type) {
                    effects.push(Effect::Reveal(text));
                    self.state = WordState::Revealing {
                        attempts,
                        then: AfterReveal::MustRepeat,
                    };
                } else {
                    effects.push(Effect::AdvanceLater);
                    self.state = WordState::Resolved;
                }
                Transition::new(Outcome::Missed, effects)
            }
        }
    }

    fn repeat(&mut self, word: &Word, answer: Answer) -> Transition {
        let verdict = match self.judge(word, &answer) {
            Ok(verdict) => verdict,
            Err(notice) => {
                self.state = WordState::MustRepeat;
                return Transition::new(Outcome::Rejected, vec![Effect::Notice(notice.into())]);
            }
        };
        if verdict.matched {
            self.state = WordState::Resolved;
            return Transition::new(Outcome::Repeated, vec![Effect::AdvanceLater]);
        }
        self.state = WordState::MustRepeat;
        let mut effects = Vec::new();
        if self.sound_enabled {
            effects.push(Effect::PlayDing);
        }
        if matches!(answer, Answer::Spoken(_)) {
            effects.push(Effect::ListenAgain);
        }
        Transition::new(Outcome::RepeatMismatch, effects)
    }

    /// The reveal animation ended; reopen input.
    pub fn reveal_finished(&mut self) -> Transition {
        match self.state {
            WordState::Revealing {
                attempts,
                then: AfterReveal::Retry,
            } => {
                self.state = WordState::Answering {
                    attempts,
                    protocol: self.template.fresh(),
                };
                Transition::new(Outcome::RevealDone, Vec::new())
            }
            WordState::Revealing {
                then: AfterReveal::MustRepeat,
                ..
            } => {
                self.state = WordState::MustRepeat;
                Transition::new(Outcome::RevealDone, Vec::new())
            }
            _ => Transition::ignored(),
        }
    }

    /// Move past a resolved word.
    pub fn advance(&mut self) -> Transition {
        match self.state {
            WordState::Resolved => self.advance_queue(),
            _ => Transition::ignored(),
        }
    }

    fn advance_queue(&mut self) -> Transition {
        match self.queue.advance() {
            QueueStep::Next(index) => {
                let text = self
                    .queue
                    .current()
                    .map(|word| word.word_text.clone())
                    .unwrap_or_default();
                self.state = self.fresh_word_state();
                Transition::new(Outcome::Advanced { index }, vec![Effect::Speak(text)])
            }
            QueueStep::Completed => {
                self.state = WordState::Finished;
                let results = self
                    .aggregator
                    .take()
                    .map(SessionAggregator::finalize)
                    .unwrap_or_default();
                self.final_results = results.clone();
                Transition::new(Outcome::Completed, vec![Effect::Complete(results)])
            }
            QueueStep::Exhausted => Transition::ignored(),
        }
    }

    fn fresh_word_state(&self) -> WordState {
        WordState::Answering {
            attempts: AttemptTracker::for_task(self.task_type),
            protocol: self.template.fresh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spelldrill_domain::InputMode;

    fn session(texts: &[&str], task_type: TaskType, mode: InputMode) -> PracticeSession {
        let words = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(format!("w{i}"), *t))
            .collect();
        let task = Task::new("a1", task_type, mode);
        let mut session = PracticeSession::new(Session::new("s1", "a1"), words, &task);
        session.begin();
        session
    }

    fn spoken(text: &str) -> Answer {
        Answer::Spoken(text.to_string())
    }

    fn typed(text: &str) -> Answer {
        Answer::Typed(text.to_string())
    }

    fn has_reveal(transition: &Transition) -> bool {
        transition
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Reveal(_)))
    }

    #[test]
    fn begin_speaks_first_word_once() {
        let words = vec![Word::new("1", "cat")];
        let task = Task::new("a", TaskType::Practice, InputMode::TypeOnly);
        let mut session = PracticeSession::new(Session::new("s", "a"), words, &task);
        let first = session.begin();
        assert_eq!(first.outcome, Outcome::Started);
        assert_eq!(first.effects, vec![Effect::Speak("cat".into())]);
        assert_eq!(session.begin().outcome, Outcome::Ignored);
    }

    #[test]
    fn practice_miss_then_hit() {
        let mut session = session(&["cat"], TaskType::Practice, InputMode::SpellOnly);
        let miss = session.submit(spoken("kat"));
        assert_eq!(miss.outcome, Outcome::Retry { attempt: 2 });
        assert_eq!(session.attempt_number(), 2);
        assert!(has_reveal(&miss));
        assert_eq!(miss.effects.first(), Some(&Effect::PlayDing));
        assert_eq!(miss.effects.last(), Some(&Effect::Speak("cat".into())));
        assert_eq!(session.stage(), Stage::Revealing);

        assert_eq!(session.submit(spoken("cat")).outcome, Outcome::Ignored);
        session.reveal_finished();

        let hit = session.submit(spoken("cat"));
        assert_eq!(hit.outcome, Outcome::Correct);
        assert_eq!(hit.effects.last(), Some(&Effect::AdvanceLater));
        let done = session.advance();
        assert_eq!(done.outcome, Outcome::Completed);
        assert_eq!(session.results().correct, 1);
        assert_eq!(session.results().total, 1);
        assert_eq!(session.results().attempts.len(), 2);
    }

    #[test]
    fn test_mode_miss_advances_without_reveal() {
        let mut session = session(&["dog", "sun"], TaskType::Test, InputMode::TypeOnly);
        let miss = session.submit(typed("dgo"));
        assert_eq!(miss.outcome, Outcome::Missed);
        assert!(!has_reveal(&miss));
        assert_eq!(miss.effects.last(), Some(&Effect::AdvanceLater));
        assert_eq!(session.results().total, 1);
        assert_eq!(session.results().correct, 0);

        let next = session.advance();
        assert_eq!(next.outcome, Outcome::Advanced { index: 1 });
        assert_eq!(next.effects, vec![Effect::Speak("sun".into())]);
        assert_eq!(session.attempt_number(), 1);
    }

    #[test]
    fn say_spell_say_happy_path() {
        let mut session = session(&["sun"], TaskType::Practice, InputMode::SaySpellSay);
        assert_eq!(session.phase(), Some(Phase::Initial));
        let said = session.submit(spoken("Sun"));
        assert_eq!(said.outcome, Outcome::PhaseMatched(Phase::Spelling));
        assert_eq!(said.effects, vec![Effect::ListenAgain]);
        assert_eq!(
            session.submit(spoken("s-u-n")).outcome,
            Outcome::PhaseMatched(Phase::Final)
        );
        assert_eq!(session.submit(spoken("sun")).outcome, Outcome::Correct);
        session.advance();
        assert_eq!(session.results().correct, 1);
        assert_eq!(session.results().attempts.len(), 1);
    }

    #[test]
    fn initial_phase_mismatch_stays_initial() {
        let mut session = session(&["sun"], TaskType::Practice, InputMode::SaySpellSay);
        for expected in [2, 3] {
            let miss = session.submit(spoken("son"));
            assert_eq!(miss.outcome, Outcome::Retry { attempt: expected });
            session.reveal_finished();
            assert_eq!(session.phase(), Some(Phase::Initial));
            assert_eq!(session.attempt_number(), expected);
        }
    }

    #[test]
    fn spelling_phase_miss_resets_to_initial() {
        let mut session = session(&["sun"], TaskType::Practice, InputMode::SaySpellSay);
        session.submit(spoken("sun"));
        assert_eq!(session.phase(), Some(Phase::Spelling));
        session.submit(spoken("s o m"));
        session.reveal_finished();
        assert_eq!(session.phase(), Some(Phase::Initial));
    }

    #[test]
    fn exhausted_practice_requires_repeat_without_cap() {
        let mut session = session(&["cat"], TaskType::Practice, InputMode::SpellOnly);
        for _ in 0..2 {
            session.submit(spoken("x"));
            session.reveal_finished();
        }
        let last = session.submit(spoken("x"));
        assert_eq!(last.outcome, Outcome::Missed);
        assert!(has_reveal(&last));
        assert_eq!(session.results().total, 1);
        session.reveal_finished();
        assert_eq!(session.stage(), Stage::MustRepeat);
        assert!(session.prompt().unwrap().must_repeat);

        for _ in 0..10 {
            let again = session.submit(spoken("kat"));
            assert_eq!(again.outcome, Outcome::RepeatMismatch);
            assert_eq!(again.effects, vec![Effect::PlayDing, Effect::ListenAgain]);
        }
        assert_eq!(session.submit(spoken("cat")).outcome, Outcome::Repeated);
        session.advance();
        assert_eq!(session.results().total, 1);
        assert_eq!(session.results().correct, 0);
    }

    #[test]
    fn empty_answers_are_not_attempts() {
        let mut session = session(&["cat"], TaskType::Practice, InputMode::TypeOnly);
        let rejected = session.submit(typed("   "));
        assert_eq!(rejected.outcome, Outcome::Rejected);
        assert_eq!(rejected.effects, vec![Effect::Notice(EMPTY_ANSWER_NOTICE.into())]);
        assert_eq!(session.attempt_number(), 1);
        assert!(session.results().attempts.is_empty());
    }

    #[test]
    fn channel_mismatch_is_ignored() {
        let mut session = session(&["cat"], TaskType::Practice, InputMode::TypeOnly);
        assert_eq!(session.submit(spoken("cat")).outcome, Outcome::Ignored);
        let mut voiced = self::session(&["cat"], TaskType::Practice, InputMode::SpellOnly);
        assert_eq!(voiced.submit(typed("cat")).outcome, Outcome::Ignored);
    }

    #[test]
    fn muted_tasks_skip_the_ding() {
        let words = vec![Word::new("1", "cat")];
        let task = Task::new("a", TaskType::Test, InputMode::TypeOnly).with_sound(false);
        let mut session = PracticeSession::new(Session::new("s", "a"), words, &task);
        session.begin();
        let miss = session.submit(typed("kat"));
        assert!(!miss.effects.contains(&Effect::PlayDing));
    }

    #[test]
    fn completion_happens_once() {
        let mut session = session(&["cat"], TaskType::Test, InputMode::TypeOnly);
        session.submit(typed("cat"));
        let done = session.advance();
        assert!(matches!(done.effects.as_slice(), [Effect::Complete(_)]));
        assert_eq!(session.advance().outcome, Outcome::Ignored);
        assert_eq!(session.stage(), Stage::Finished);
        assert!(session.prompt().is_none());
    }

    #[test]
    fn empty_word_list_completes_on_begin() {
        let task = Task::new("a", TaskType::Practice, InputMode::TypeOnly);
        let mut session = PracticeSession::new(Session::new("s", "a"), Vec::new(), &task);
        let begin = session.begin();
        assert_eq!(begin.outcome, Outcome::Completed);
        assert_eq!(session.results().total, 0);
    }

    #[test]
    fn total_equals_word_count_for_any_answers() {
        let texts = ["cat", "dog", "sun", "hat"];
        let scripts: [&[&str]; 3] = [&["cat", "x", "x"], &["x", "x", "x", "cat"], &["dog"]];
        for task_type in [TaskType::Practice, TaskType::Test] {
            for script in scripts {
                let mut session = session(&texts, task_type, InputMode::TypeOnly);
                let mut turn = 0;
                while session.stage() != Stage::Finished {
                    match session.stage() {
                        Stage::Answering | Stage::MustRepeat => {
                            let guess = script[turn % script.len()];
                            turn += 1;
                            let word = session.current_word().unwrap().word_text.clone();
                            let answer = if session.stage() == Stage::MustRepeat {
                                word
                            } else {
                                guess.to_string()
                            };
                            session.submit(Answer::Typed(answer));
                            assert!(session.attempt_number() <= session.max_attempts());
                        }
                        Stage::Revealing => {
                            session.reveal_finished();
                        }
                        Stage::Resolved => {
                            session.advance();
                        }
                        Stage::Pending | Stage::Finished => unreachable!(),
                    }
                }
                assert_eq!(session.results().total as usize, texts.len());
            }
        }
    }
}
