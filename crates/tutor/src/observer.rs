use spelldrill_domain::Word;

use crate::reveal::RevealFrame;
use crate::session::{Outcome, Prompt};

/// Presentation hooks fired by the runner. Every method defaults to a no-op.
pub trait PracticeObserver: Send {
    fn word_started(&mut self, _word: &Word, _position: usize, _total: usize) {}

    fn prompt(&mut self, _prompt: &Prompt) {}

    fn outcome(&mut self, _outcome: &Outcome) {}

    fn letter_revealed(&mut self, _frame: &RevealFrame) {}

    fn reveal_finished(&mut self) {}

    fn notice(&mut self, _message: &str) {}

    fn alert(&mut self, _title: &str, _message: &str) {}

    fn score(&mut self, _correct: u32, _total: u32) {}
}

#[derive(Debug, Default)]
pub struct SilentObserver;

impl PracticeObserver for SilentObserver {}
