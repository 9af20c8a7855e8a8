use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use spelldrill_domain::{
    AssignmentId, AttemptRecord, CompletedResults, Session, SessionId, SessionResults, Word,
    WordId,
};

use crate::api::{ApiError, PracticeApi, StartedSession};

#[derive(Default)]
struct OfflineState {
    words: HashMap<SessionId, Vec<Word>>,
    attempts: HashMap<SessionId, Vec<AttemptRecord>>,
}

/// In-process backend serving one word list; grades sessions locally.
pub struct OfflinePracticeApi {
    words: Vec<Word>,
    state: Mutex<OfflineState>,
    next_session: AtomicUsize,
    completions: AtomicUsize,
    fail_start: bool,
    fail_submissions: bool,
}

impl OfflinePracticeApi {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            state: Mutex::new(OfflineState::default()),
            next_session: AtomicUsize::new(1),
            completions: AtomicUsize::new(0),
            fail_start: false,
            fail_submissions: false,
        }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Word::new(WordId::new((index + 1).to_string()), text))
            .collect();
        Self::new(words)
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn submitted(&self, session_id: &SessionId) -> Vec<AttemptRecord> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.attempts.get(session_id).cloned())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, OfflineState>, ApiError> {
        self.state
            .lock()
            .map_err(|err| ApiError::Unavailable(err.to_string()))
    }
}

/// First-try accuracy over the session's word list.
pub fn grade(words: &[Word], attempts: &[AttemptRecord]) -> CompletedResults {
    let total_words = words.len() as u32;
    let mut seen = HashSet::new();
    let mut first_try = 0u32;
    let mut solved = HashSet::new();
    for attempt in attempts {
        if seen.insert(&attempt.word_id) && attempt.is_correct {
            first_try += 1;
        }
        if attempt.is_correct {
            solved.insert(&attempt.word_id);
        }
    }
    let accuracy_percentage = if total_words == 0 {
        0.0
    } else {
        (first_try as f32 / total_words as f32 * 100.0).round()
    };
    CompletedResults {
        accuracy_percentage,
        correct_first_try: first_try,
        total_words,
        total_correct: solved.len() as u32,
        correct_definitions: 0,
        mastered: total_words > 0 && first_try == total_words,
    }
}

#[async_trait]
impl PracticeApi for OfflinePracticeApi {
    async fn start_session(&self, assignment_id: &AssignmentId) -> Result<StartedSession, ApiError> {
        if self.fail_start {
            return Err(ApiError::Unavailable("offline backend refused to start".into()));
        }
        let number = self.next_session.fetch_add(1, Ordering::SeqCst);
        let session = Session::new(format!("offline-{number}"), assignment_id.clone());
        self.lock()?
            .words
            .insert(session.id.clone(), self.words.clone());
        info!(session = %session.id, words = self.words.len(), "offline session started");
        Ok(StartedSession {
            session,
            words: self.words.clone(),
        })
    }

    async fn submit_attempt(
        &self,
        session_id: &SessionId,
        attempt: &AttemptRecord,
        _definition_input: Option<&str>,
    ) -> Result<(), ApiError> {
        if self.fail_submissions {
            return Err(ApiError::Unavailable("attempt not stored".into()));
        }
        debug!(session = %session_id, word = %attempt.word_id, "offline attempt");
        self.lock()?
            .attempts
            .entry(session_id.clone())
            .or_default()
            .push(attempt.clone());
        Ok(())
    }

    async fn complete_session(
        &self,
        session_id: &SessionId,
        results: &SessionResults,
    ) -> Result<CompletedResults, ApiError> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        let words = state
            .words
            .get(session_id)
            .ok_or_else(|| ApiError::Unavailable(format!("unknown session {session_id}")))?;
        // Submissions are best-effort; fall back to the device's own list.
        let attempts = match state.attempts.get(session_id) {
            Some(stored) if !stored.is_empty() => stored.as_slice(),
            _ => results.attempts.as_slice(),
        };
        Ok(grade(words, attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spelldrill_domain::InputMethod;

    fn attempt(word: &str, correct: bool) -> AttemptRecord {
        AttemptRecord {
            word_id: WordId::new(word),
            user_input: String::new(),
            input_method: InputMethod::Typing,
            is_correct: correct,
        }
    }

    #[test]
    fn grade_counts_first_try_only() {
        let words = vec![Word::new("1", "cat"), Word::new("2", "dog")];
        let attempts = vec![attempt("1", false), attempt("1", true), attempt("2", true)];
        let results = grade(&words, &attempts);
        assert_eq!(results.correct_first_try, 1);
        assert_eq!(results.total_correct, 2);
        assert_eq!(results.accuracy_percentage, 50.0);
        assert!(!results.mastered);
    }

    #[tokio::test]
    async fn offline_round_trip() {
        let api = OfflinePracticeApi::from_texts(["sun"]);
        let started = api.start_session(&AssignmentId::new("a")).await.unwrap();
        assert_eq!(started.words.len(), 1);
        let word_id = started.words[0].id.clone();
        api.submit_attempt(&started.session.id, &attempt(word_id.as_str(), true), None)
            .await
            .unwrap();
        let results = api
            .complete_session(&started.session.id, &SessionResults::default())
            .await
            .unwrap();
        assert!(results.mastered);
        assert_eq!(results.accuracy_percentage, 100.0);
        assert_eq!(api.completions(), 1);
    }

    #[tokio::test]
    async fn failing_start_is_reported() {
        let api = OfflinePracticeApi::from_texts(["sun"]).failing_start();
        assert!(api.start_session(&AssignmentId::new("a")).await.is_err());
    }
}
