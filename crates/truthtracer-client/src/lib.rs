pub mod http;
pub mod request;

use async_trait::async_trait;
use thiserror::Error;
use truthtracer_schema::{
    AnalysisStatus, Conclusion, FactCheck, FactResult, Socratic, TrustChain, Verdict, FULFILLED,
};

pub use http::{ApiErrorKind, HttpAnalysisClient, ANALYZE_PATH};
pub use request::{run_analysis, AnalysisRequest, RequestState, TransitionError};

/// The single message shown to users for any failed analysis.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze the claim. Please try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no claim provided")]
    EmptyClaim,

    #[error("analysis api transport error: {0}")]
    Transport(String),

    #[error("analysis api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("analysis api returned an unreadable body: {0}")]
    Decode(String),
}

impl AnalysisError {
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::EmptyClaim)
    }

    /// What the user sees. Every transport and API failure collapses to one message.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyClaim => "No query provided",
            _ => ANALYSIS_FAILED_MESSAGE,
        }
    }
}

/// Submits a claim to the external analysis service.
///
/// One call is one request: no retries, no caching.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, claim: &str) -> Result<FactResult, AnalysisError>;
}

/// Offline client that answers every claim locally.
pub struct StubAnalysisClient {
    canned: Option<FactResult>,
    fail: bool,
}

impl StubAnalysisClient {
    pub fn new() -> Self {
        Self {
            canned: None,
            fail: false,
        }
    }

    pub fn with_result(result: FactResult) -> Self {
        Self {
            canned: Some(result),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            canned: None,
            fail: true,
        }
    }

    fn placeholder(claim: &str) -> FactResult {
        FactResult {
            claim: Some(claim.to_owned()),
            fact_check: Some(FactCheck {
                verdict: Some(Verdict::Unverified),
                explanation: Some(format!("[stub] no analysis performed for: {claim}")),
                sources: vec![],
            }),
            trust_chain: Some(TrustChain {
                has_trust_chain: Some(false),
                confidence: Some(0.0),
                ..TrustChain::default()
            }),
            socratic: Some(Socratic {
                reasoning_steps: vec![],
                conclusion: Some(Conclusion::default()),
            }),
            status: Some(AnalysisStatus {
                fact_check: Some(FULFILLED.into()),
                trust_chain: Some(FULFILLED.into()),
                socratic: Some(FULFILLED.into()),
                timestamp: None,
            }),
            ..FactResult::default()
        }
    }
}

impl Default for StubAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisClient for StubAnalysisClient {
    async fn analyze(&self, claim: &str) -> Result<FactResult, AnalysisError> {
        if claim.trim().is_empty() {
            return Err(AnalysisError::EmptyClaim);
        }
        if self.fail {
            return Err(AnalysisError::Transport("[stub] forced failure".into()));
        }
        let result = match &self.canned {
            Some(result) => result.clone(),
            None => Self::placeholder(claim),
        };
        Ok(result.with_claim_fallback(claim))
    }
}
