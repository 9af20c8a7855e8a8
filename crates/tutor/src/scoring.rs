/// Reduce a spoken transcript to its letters: lower-case `a-z` only.
///
/// Recognizers add punctuation, spaces and digits ("S. U. N.", "s-u-n"), so
/// everything else is dropped before comparing.
pub fn normalize_spoken(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase)
        .collect()
}

pub fn normalize_typed(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub matched: bool,
    /// The answer as it is recorded for the attempt.
    pub normalized: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpellingChecker;

impl SpellingChecker {
    pub fn check_typed(&self, target: &str, input: &str) -> Verdict {
        let normalized = normalize_typed(input);
        Verdict {
            matched: !normalized.is_empty() && normalized == normalize_typed(target),
            normalized,
        }
    }

    /// Both sides are reduced to letters, so hyphenated and apostrophe words
    /// can still be matched by voice.
    pub fn check_spoken(&self, target: &str, utterance: &str) -> Verdict {
        let normalized = normalize_spoken(utterance);
        Verdict {
            matched: !normalized.is_empty() && normalized == normalize_spoken(target),
            normalized,
        }
    }
}
