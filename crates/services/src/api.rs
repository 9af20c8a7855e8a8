use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use spelldrill_domain::{
    AssignmentId, AttemptRecord, CompletedResults, Session, SessionId, SessionResults, Word,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("not signed in or the session token expired")]
    Unauthorized,
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Response of `start_session`: the run and its word list in order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StartedSession {
    pub session: Session,
    pub words: Vec<Word>,
}

/// The remote practice endpoints a session talks to.
#[async_trait]
pub trait PracticeApi: Send + Sync {
    async fn start_session(&self, assignment_id: &AssignmentId) -> Result<StartedSession, ApiError>;

    async fn submit_attempt(
        &self,
        session_id: &SessionId,
        attempt: &AttemptRecord,
        definition_input: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn complete_session(
        &self,
        session_id: &SessionId,
        results: &SessionResults,
    ) -> Result<CompletedResults, ApiError>;
}
