use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use truthtracer_schema::FactResult;

use crate::{AnalysisClient, AnalysisError};

pub const ANALYZE_PATH: &str = "/truth-tracer/claims/analyze";

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    api_base: String,
    /// `None` leaves the request to the transport default, which never gives up.
    timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    RateLimit,
    ServerError,
    AuthError,
    InvalidRequest,
    Unknown,
}

impl ApiErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            429 => Self::RateLimit,
            401 | 403 => Self::AuthError,
            400 | 422 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub claim: &'a str,
}

impl HttpAnalysisClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: trim_base(api_base.into()),
            timeout: None,
        }
    }

    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_base: trim_base(api_base.into()),
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_base, ANALYZE_PATH)
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, claim: &str) -> Result<FactResult, AnalysisError> {
        if claim.trim().is_empty() {
            return Err(AnalysisError::EmptyClaim);
        }

        let url = self.endpoint();
        tracing::debug!(%url, "submitting claim for analysis");

        let resp = match self
            .client
            .post(&url)
            .json(&AnalyzeRequest { claim })
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                let message = match self.timeout {
                    Some(t) => format!("request timed out after {t:?}"),
                    None => format!("request timed out: {e}"),
                };
                return Err(AnalysisError::Transport(message));
            }
            Err(e) if e.is_connect() => {
                return Err(AnalysisError::Transport(format!("connect: {e}")));
            }
            Err(e) => return Err(AnalysisError::Transport(e.to_string())),
        };

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(format!("reading body: {e}")))?;

        if !status.is_success() {
            let err = format_api_error(status, &text);
            tracing::warn!(kind = ?ApiErrorKind::from_status(status), %err, "analysis request failed");
            return Err(err);
        }

        let result: FactResult =
            serde_json::from_str(&text).map_err(|e| AnalysisError::Decode(e.to_string()))?;
        tracing::info!(verdict = %result.verdict(), "claim analysed");
        Ok(result.with_claim_fallback(claim))
    }
}

fn trim_base(api_base: String) -> String {
    api_base.trim_end_matches('/').to_string()
}

/// Pull a human-readable message out of an error body, if it has one.
fn format_api_error(status: StatusCode, body: &str) -> AnalysisError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error").and_then(|e| e.get("message")))
                .or_else(|| v.get("error"))
        })
        .and_then(|m| m.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        });
    AnalysisError::Api {
        status: status.as_u16(),
        message,
    }
}
