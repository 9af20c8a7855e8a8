use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use spelldrill_domain::{
    AssignmentId, AttemptRecord, CompletedResults, InputMethod, SessionId, SessionResults, WordId,
};

use crate::api::{ApiError, PracticeApi, StartedSession};
use crate::auth::TokenStore;
use crate::config::ApiConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest<'a> {
    task_assignment_id: &'a AssignmentId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttemptRequest<'a> {
    session_id: &'a SessionId,
    word_id: &'a WordId,
    user_input: &'a str,
    input_method: InputMethod,
    definition_input: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest<'a> {
    session_id: &'a SessionId,
}

#[derive(Deserialize)]
struct CompleteResponse {
    results: CompletedResults,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    token: Option<String>,
}

/// JSON-over-HTTPS client for the practice backend.
#[derive(Clone)]
pub struct HttpPracticeClient {
    http: Client,
    config: ApiConfig,
    tokens: Arc<dyn TokenStore>,
}

impl HttpPracticeClient {
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST with one retry on timeout or connection failure and one token
    /// refresh on 401.
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);
        let mut retried = false;
        let mut refreshed = false;
        loop {
            let mut request = self.http.post(&url).json(body);
            if let Some(token) = self.tokens.token() {
                request = request.bearer_auth(token);
            }
            match request.send().await {
                Err(err) if !retried && (err.is_timeout() || err.is_connect()) => {
                    retried = true;
                    if err.is_timeout() {
                        warn!(%url, "request timed out, retrying");
                    } else {
                        warn!(%url, %err, "network error, retrying");
                        tokio::time::sleep(self.config.retry_pause()).await;
                    }
                }
                Err(err) => return Err(err.into()),
                Ok(response) if response.status() == StatusCode::UNAUTHORIZED && !refreshed => {
                    refreshed = true;
                    self.refresh_token().await?;
                }
                Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                    return Err(ApiError::Unauthorized);
                }
                Ok(response) if !response.status().is_success() => {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    return Err(ApiError::Status { status, message });
                }
                Ok(response) => return Ok(response),
            }
        }
    }

    async fn refresh_token(&self) -> Result<(), ApiError> {
        let current = self.tokens.token().ok_or(ApiError::Unauthorized)?;
        let outcome = self
            .http
            .post(self.config.endpoint("auth/refresh"))
            .timeout(self.config.refresh_timeout())
            .json(&RefreshRequest { token: &current })
            .send()
            .await
            .and_then(Response::error_for_status);
        let fresh = match outcome {
            Ok(response) => response.json::<RefreshResponse>().await.ok().and_then(|r| r.token),
            Err(err) => {
                warn!(%err, "token refresh failed");
                None
            }
        };
        match fresh {
            Some(token) => {
                info!("refreshed session token");
                self.tokens.save(&token);
                Ok(())
            }
            None => {
                self.tokens.clear();
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[async_trait]
impl PracticeApi for HttpPracticeClient {
    #[instrument(skip(self))]
    async fn start_session(&self, assignment_id: &AssignmentId) -> Result<StartedSession, ApiError> {
        let response = self
            .post(
                "practice/start",
                &StartRequest {
                    task_assignment_id: assignment_id,
                },
            )
            .await?;
        let started: StartedSession = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        info!(session = %started.session.id, words = started.words.len(), "session started");
        Ok(started)
    }

    #[instrument(skip(self, attempt), fields(word = %attempt.word_id, correct = attempt.is_correct))]
    async fn submit_attempt(
        &self,
        session_id: &SessionId,
        attempt: &AttemptRecord,
        definition_input: Option<&str>,
    ) -> Result<(), ApiError> {
        self.post(
            "practice/attempt",
            &AttemptRequest {
                session_id,
                word_id: &attempt.word_id,
                user_input: &attempt.user_input,
                input_method: attempt.input_method,
                definition_input,
            },
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, results))]
    async fn complete_session(
        &self,
        session_id: &SessionId,
        results: &SessionResults,
    ) -> Result<CompletedResults, ApiError> {
        debug!(
            correct = results.correct,
            total = results.total,
            attempts = results.attempts.len(),
            "completing session"
        );
        let response = self
            .post("practice/complete", &CompleteRequest { session_id })
            .await?;
        let body: CompleteResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(body.results)
    }
}
