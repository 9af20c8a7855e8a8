use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::{AssignmentId, SessionId, WordId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    #[serde(default, alias = "taskAssignmentId")]
    pub assignment_id: Option<AssignmentId>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>, assignment_id: impl Into<AssignmentId>) -> Self {
        Self {
            id: id.into(),
            assignment_id: Some(assignment_id.into()),
            started_at: Some(OffsetDateTime::now_utc()),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputMethod {
    Voice,
    Typing,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub word_id: WordId,
    pub user_input: String,
    pub input_method: InputMethod,
    pub is_correct: bool,
}

/// Counts kept on the device while a session runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResults {
    pub correct: u32,
    pub total: u32,
    pub attempts: Vec<AttemptRecord>,
}

/// Results computed by the backend when a session is completed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletedResults {
    pub accuracy_percentage: f32,
    pub correct_first_try: u32,
    pub total_words: u32,
    pub total_correct: u32,
    pub correct_definitions: u32,
    pub mastered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_method_wire_names() {
        assert_eq!(serde_json::to_string(&InputMethod::Voice).unwrap(), "\"VOICE\"");
        assert_eq!(serde_json::to_string(&InputMethod::Typing).unwrap(), "\"TYPING\"");
    }

    #[test]
    fn completed_results_tolerate_missing_fields() {
        let results: CompletedResults =
            serde_json::from_str(r#"{"accuracyPercentage": 75, "totalWords": 4}"#).unwrap();
        assert_eq!(results.total_words, 4);
        assert_eq!(results.accuracy_percentage, 75.0);
        assert!(!results.mastered);
    }

    #[test]
    fn session_from_wire() {
        let session: Session = serde_json::from_str(
            r#"{"id": 9, "taskAssignmentId": 4, "startedAt": "2024-03-02T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(session.id.as_str(), "9");
        assert_eq!(session.assignment_id.unwrap().as_str(), "4");
        assert!(session.started_at.is_some());
    }
}
