//! Concurrent dispatch of scoring requests.
//!
//! Runs every request of a batch against a [`Scorer`] at once and collects one
//! [`ScoringResult`] per request, in request order. Each call runs inside its
//! own span, parented to the span that built the request when a trace context
//! was captured. A failing call only fails its own result.

use super::backend::Scorer;
use super::messages::{ScoringRequest, ScoringResult};
use futures_util::future::join_all;
use tracing::Instrument;

/// Scores all requests concurrently.
///
/// # Examples
///
/// ```
/// use eval_console::scoring::{score_all, ScoringRequest, SimulatedScorer};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let requests = vec![ScoringRequest {
///     eval_id: "L1".into(),
///     generation: 1,
///     content: "How do I reset my password?".into(),
///     is_knowledge_base: false,
///     trace_context: None,
/// }];
/// let results = score_all(&SimulatedScorer::default(), &requests).await;
/// assert_eq!(results.len(), 1);
/// assert!(results[0].outcome.is_ok());
/// # });
/// ```
pub async fn score_all(scorer: &dyn Scorer, requests: &[ScoringRequest]) -> Vec<ScoringResult> {
    tracing::debug!(request_count = requests.len(), "dispatching scoring requests");

    let calls = requests.iter().map(|request| {
        let span = request_span(request);
        async move {
            let outcome = scorer.score(request).await;
            if let Err(e) = &outcome {
                tracing::warn!(eval_id = %request.eval_id, error = %e, "scoring failed");
            }
            ScoringResult::new(request, outcome)
        }
        .instrument(span)
    });

    join_all(calls).await
}

fn request_span(request: &ScoringRequest) -> tracing::Span {
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let span = tracing::debug_span!("score_request", eval_id = %request.eval_id);
    if let Some(parent) = request
        .trace_context
        .as_ref()
        .and_then(super::messages::TraceContext::to_otel_context)
    {
        span.set_parent(parent);
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Score;
    use crate::scoring::{ScoredAnswer, ScoringError};
    use futures_util::future::BoxFuture;

    struct FailOn(&'static str);

    impl Scorer for FailOn {
        fn score<'a>(
            &'a self,
            request: &'a ScoringRequest,
        ) -> BoxFuture<'a, Result<ScoredAnswer, ScoringError>> {
            Box::pin(async move {
                if request.eval_id == self.0 {
                    Err(ScoringError::Backend("upstream timeout".into()))
                } else {
                    Ok(ScoredAnswer {
                        answer: "ok".into(),
                        model_score: Score::MAX,
                    })
                }
            })
        }
    }

    fn request(id: &str) -> ScoringRequest {
        ScoringRequest {
            eval_id: id.into(),
            generation: 1,
            content: "q".into(),
            is_knowledge_base: false,
            trace_context: None,
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_block_the_rest() {
        let requests = vec![request("A"), request("B"), request("C")];

        let results = score_all(&FailOn("B"), &requests).await;

        let ids: Vec<&str> = results.iter().map(|r| r.eval_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert!(results[0].outcome.is_ok());
        assert!(results[1].outcome.is_err());
        assert!(results[2].outcome.is_ok());
    }

    #[tokio::test]
    async fn empty_batch_yields_no_results() {
        let results = score_all(&FailOn("B"), &[]).await;
        assert!(results.is_empty());
    }
}
