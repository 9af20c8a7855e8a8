use thiserror::Error;

use spelldrill_domain::DomainError;
use spelldrill_services::ApiError;

#[derive(Debug, Error)]
pub enum PracticeError {
    #[error("failed to start practice session")]
    Bootstrap(#[source] ApiError),
    #[error("failed to complete session")]
    Completion(#[source] ApiError),
    #[error(transparent)]
    InvalidWords(#[from] DomainError),
}
