use std::time::Duration;

use spelldrill_domain::TaskType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPacing {
    pub letter_interval: Duration,
    /// How long the full spelling stays up before input reopens.
    pub hold: Duration,
}

impl Default for RevealPacing {
    fn default() -> Self {
        Self {
            letter_interval: Duration::from_millis(300),
            hold: Duration::from_millis(2_000),
        }
    }
}

/// The correct spelling is only ever shown in practice tasks.
pub struct RevealPolicy;

impl RevealPolicy {
    pub fn permits(task_type: TaskType) -> bool {
        !task_type.is_test()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    pub index: usize,
    pub letter: char,
    pub revealed: String,
}

/// Letter-by-letter disclosure of a word. Yields each letter once;
/// `restart` rewinds it.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    letters: Vec<char>,
    cursor: usize,
    pacing: RevealPacing,
}

impl RevealSequence {
    pub fn new(word: &str, pacing: RevealPacing) -> Self {
        Self {
            letters: word.chars().collect(),
            cursor: 0,
            pacing,
        }
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    pub fn pacing(&self) -> RevealPacing {
        self.pacing
    }

    /// Total time from first letter to reopened input.
    pub fn duration(&self) -> Duration {
        self.pacing.letter_interval * self.letters.len() as u32 + self.pacing.hold
    }

    /// Run the whole reveal on the clock, handing each frame to `on_frame`.
    pub async fn play<F>(&mut self, mut on_frame: F)
    where
        F: FnMut(&RevealFrame),
    {
        self.restart();
        while self.cursor < self.letters.len() {
            tokio::time::sleep(self.pacing.letter_interval).await;
            if let Some(frame) = self.next() {
                on_frame(&frame);
            }
        }
        tokio::time::sleep(self.pacing.hold).await;
    }
}

impl Iterator for RevealSequence {
    type Item = RevealFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let letter = *self.letters.get(self.cursor)?;
        self.cursor += 1;
        Some(RevealFrame {
            index: self.cursor - 1,
            letter,
            revealed: self.letters[..self.cursor].iter().collect(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.letters.len() - self.cursor;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RevealSequence {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_length_matches_word() {
        let frames: Vec<_> = RevealSequence::new("cat", RevealPacing::default()).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].revealed, "cat");
        assert_eq!(frames[1].letter, 'a');
    }

    #[test]
    fn sequence_is_one_shot_until_restarted() {
        let mut sequence = RevealSequence::new("up", RevealPacing::default());
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.by_ref().count(), 2);
        assert!(sequence.next().is_none());
        sequence.restart();
        assert_eq!(sequence.next().map(|f| f.letter), Some('u'));
    }

    #[test]
    fn policy_never_reveals_in_tests() {
        assert!(RevealPolicy::permits(TaskType::Practice));
        assert!(!RevealPolicy::permits(TaskType::Test));
    }

    #[tokio::test(start_paused = true)]
    async fn play_paces_letters_then_holds() {
        let mut sequence = RevealSequence::new("dog", RevealPacing::default());
        let started = tokio::time::Instant::now();
        let mut seen = Vec::new();
        sequence.play(|frame| seen.push(frame.letter)).await;
        assert_eq!(seen, vec!['d', 'o', 'g']);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2_900) && elapsed < Duration::from_millis(3_000));
        assert_eq!(sequence.duration(), Duration::from_millis(2_900));
    }
}
