use spelldrill_domain::{AttemptRecord, SessionResults};
use tracing::debug;

/// Running tally for one session. `finalize` consumes it, so results are
/// produced once.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    results: SessionResults,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self, attempt: AttemptRecord) {
        self.results.attempts.push(attempt);
    }

    pub fn record_correct(&mut self) {
        self.results.correct += 1;
        self.results.total += 1;
    }

    pub fn record_incorrect(&mut self) {
        self.results.total += 1;
    }

    pub fn snapshot(&self) -> &SessionResults {
        &self.results
    }

    pub fn finalize(self) -> SessionResults {
        debug!(
            correct = self.results.correct,
            total = self.results.total,
            "session results finalized"
        );
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spelldrill_domain::{InputMethod, WordId};

    #[test]
    fn correct_counts_toward_both_totals() {
        let mut aggregator = SessionAggregator::new();
        aggregator.record_correct();
        aggregator.record_incorrect();
        aggregator.record_attempt(AttemptRecord {
            word_id: WordId::new("1"),
            user_input: "cat".into(),
            input_method: InputMethod::Typing,
            is_correct: true,
        });
        let results = aggregator.finalize();
        assert_eq!(results.correct, 1);
        assert_eq!(results.total, 2);
        assert_eq!(results.attempts.len(), 1);
    }
}
