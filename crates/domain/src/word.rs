use serde::{Deserialize, Serialize};

use crate::{error::DomainError, ids::WordId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub word_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
}

impl Word {
    pub fn new(id: impl Into<WordId>, word_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word_text: word_text.into(),
            definition: None,
            pronunciation_hint: None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.word_text.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "word {} has no text",
                self.id
            )));
        }
        Ok(())
    }

    /// Number of characters shown by a letter-by-letter reveal.
    pub fn letter_count(&self) -> usize {
        self.word_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_from_wire() {
        let word: Word =
            serde_json::from_str(r#"{"id": 3, "wordText": "cat", "definition": "a pet"}"#).unwrap();
        assert_eq!(word.word_text, "cat");
        assert_eq!(word.definition.as_deref(), Some("a pet"));
        assert!(word.pronunciation_hint.is_none());
        assert_eq!(word.letter_count(), 3);
    }

    #[test]
    fn blank_words_fail_validation() {
        assert!(Word::new("1", "  ").validate().is_err());
        assert!(Word::new("1", "sun").validate().is_ok());
    }
}
