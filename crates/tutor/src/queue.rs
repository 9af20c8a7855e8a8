use spelldrill_domain::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStep {
    /// Moved to the word at this index.
    Next(usize),
    /// Reached the end; reported once.
    Completed,
    /// Already finished, nothing happened.
    Exhausted,
}

/// The session's words in order. The index only moves forward and stops at
/// `len()`.
#[derive(Debug, Clone)]
pub struct WordQueue {
    words: Vec<Word>,
    index: usize,
    completed: bool,
}

impl WordQueue {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            index: 0,
            completed: false,
        }
    }

    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.words.len()
    }

    /// Fraction of the list reached, counting the current word.
    pub fn progress(&self) -> f32 {
        if self.words.is_empty() {
            return 1.0;
        }
        ((self.index + 1).min(self.words.len())) as f32 / self.words.len() as f32
    }

    pub fn advance(&mut self) -> QueueStep {
        if self.index < self.words.len() {
            self.index += 1;
        }
        if self.index < self.words.len() {
            QueueStep::Next(self.index)
        } else if !self.completed {
            self.completed = true;
            QueueStep::Completed
        } else {
            QueueStep::Exhausted
        }
    }
}
