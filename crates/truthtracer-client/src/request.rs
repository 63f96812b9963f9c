use thiserror::Error;
use truthtracer_schema::FactResult;

use crate::{AnalysisClient, AnalysisError};

/// Lifecycle of one analysis request: `Idle -> InFlight -> {Succeeded, Failed}`.
#[derive(Debug)]
pub enum RequestState {
    Idle,
    InFlight { claim: String },
    Succeeded(FactResult),
    Failed(AnalysisError),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InFlight { .. } => "in-flight",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} a request that is {from}")]
pub struct TransitionError {
    pub from: &'static str,
    pub action: &'static str,
}

#[derive(Debug)]
pub struct AnalysisRequest {
    state: RequestState,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn begin(&mut self, claim: impl Into<String>) -> Result<(), TransitionError> {
        if !matches!(self.state, RequestState::Idle) {
            return Err(TransitionError {
                from: self.state.name(),
                action: "begin",
            });
        }
        self.state = RequestState::InFlight {
            claim: claim.into(),
        };
        Ok(())
    }

    pub fn complete(
        &mut self,
        outcome: Result<FactResult, AnalysisError>,
    ) -> Result<(), TransitionError> {
        if !matches!(self.state, RequestState::InFlight { .. }) {
            return Err(TransitionError {
                from: self.state.name(),
                action: "complete",
            });
        }
        self.state = match outcome {
            Ok(result) => RequestState::Succeeded(result),
            Err(error) => RequestState::Failed(error),
        };
        Ok(())
    }

    /// Back to `Idle` for a new submission. An outstanding request is not cancelled.
    pub fn restart(&mut self) {
        self.state = RequestState::Idle;
    }

    pub fn into_outcome(self) -> Option<Result<FactResult, AnalysisError>> {
        match self.state {
            RequestState::Succeeded(result) => Some(Ok(result)),
            RequestState::Failed(error) => Some(Err(error)),
            RequestState::Idle | RequestState::InFlight { .. } => None,
        }
    }
}

/// Drive `request` through one full submission of `claim`.
pub async fn run_analysis(
    client: &dyn AnalysisClient,
    request: &mut AnalysisRequest,
    claim: &str,
) -> Result<(), TransitionError> {
    request.restart();
    request.begin(claim)?;
    tracing::debug!(state = request.state().name(), "analysis started");
    let outcome = client.analyze(claim).await;
    request.complete(outcome)?;
    tracing::debug!(state = request.state().name(), "analysis finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StubAnalysisClient;

    #[test]
    fn happy_path_transitions() {
        let mut request = AnalysisRequest::new();
        assert_eq!(request.state().name(), "idle");

        request.begin("claim").unwrap();
        assert!(matches!(request.state(), RequestState::InFlight { claim } if claim == "claim"));
        assert!(!request.state().is_terminal());

        request.complete(Ok(FactResult::new("claim"))).unwrap();
        assert!(request.state().is_terminal());
        assert!(matches!(request.into_outcome(), Some(Ok(_))));
    }

    #[test]
    fn failure_is_terminal() {
        let mut request = AnalysisRequest::new();
        request.begin("claim").unwrap();
        request
            .complete(Err(AnalysisError::Transport("refused".into())))
            .unwrap();
        assert_eq!(request.state().name(), "failed");

        let err = request.complete(Ok(FactResult::default())).unwrap_err();
        assert_eq!(
            err,
            TransitionError {
                from: "failed",
                action: "complete"
            }
        );
    }

    #[test]
    fn begin_twice_is_rejected() {
        let mut request = AnalysisRequest::new();
        request.begin("a").unwrap();
        let err = request.begin("b").unwrap_err();
        assert_eq!(err.to_string(), "cannot begin a request that is in-flight");
    }

    #[test]
    fn complete_without_begin_is_rejected() {
        let mut request = AnalysisRequest::new();
        assert!(request.complete(Ok(FactResult::default())).is_err());
        assert!(request.into_outcome().is_none());
    }

    #[test]
    fn restart_returns_to_idle() {
        let mut request = AnalysisRequest::new();
        request.begin("a").unwrap();
        request.complete(Ok(FactResult::default())).unwrap();
        request.restart();
        assert_eq!(request.state().name(), "idle");
        request.begin("b").unwrap();
    }

    #[tokio::test]
    async fn run_analysis_reaches_success() {
        let client = StubAnalysisClient::new();
        let mut request = AnalysisRequest::new();
        run_analysis(&client, &mut request, "The sky is blue.")
            .await
            .unwrap();
        let result = request.into_outcome().unwrap().unwrap();
        assert_eq!(result.claim_text(), "The sky is blue.");
    }

    #[tokio::test]
    async fn run_analysis_restarts_a_finished_request() {
        let client = StubAnalysisClient::failing();
        let mut request = AnalysisRequest::new();
        run_analysis(&client, &mut request, "first").await.unwrap();
        assert_eq!(request.state().name(), "failed");

        let client = StubAnalysisClient::new();
        run_analysis(&client, &mut request, "second").await.unwrap();
        assert_eq!(request.state().name(), "succeeded");
    }
}
