//! Request and response types exchanged with a scoring backend.
//!
//! A batch run turns every pending evaluation entry into a [`ScoringRequest`].
//! Requests leave the lifecycle engine as data (inside an
//! [`Action`](crate::app::Action)), are answered asynchronously, and come back
//! as [`ScoringResult`]s that the engine commits in one pass. Requests carry a
//! [`TraceContext`] so the spans of the scoring calls link back to the span
//! that started the batch.

use super::backend::ScoringError;
use crate::domain::{EvaluationEntry, Score};
use serde::{Deserialize, Serialize};

/// Distributed tracing context captured when a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the dispatching span, as a hex string.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds a remote parent context for spans created by the receiver.
    ///
    /// Returns `None` if either id is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Everything a backend needs to answer and score one pending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// Evaluation entry the result will be committed to.
    pub eval_id: String,

    /// Generation of that entry when the request was built.
    pub generation: u64,

    /// Question text to answer.
    pub content: String,

    /// Whether the question was asked against the private knowledge base.
    pub is_knowledge_base: bool,

    /// Trace context for linking spans across the dispatch boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl ScoringRequest {
    /// Builds a request for an entry, capturing the current trace context.
    #[must_use]
    pub fn for_entry(entry: &EvaluationEntry) -> Self {
        Self {
            eval_id: entry.id.clone(),
            generation: entry.generation,
            content: entry.content.clone(),
            is_knowledge_base: entry.is_knowledge_base,
            trace_context: TraceContext::from_current(),
        }
    }
}

/// Successful backend reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredAnswer {
    /// Generated answer text; must be non-empty to be committed.
    pub answer: String,

    /// Initial model score.
    pub model_score: Score,
}

/// The settled outcome of one request.
///
/// Carries the request's `eval_id` and `generation`; a result only applies to
/// the entry incarnation it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    pub eval_id: String,
    pub generation: u64,
    pub outcome: Result<ScoredAnswer, ScoringError>,
}

impl ScoringResult {
    #[must_use]
    pub fn new(request: &ScoringRequest, outcome: Result<ScoredAnswer, ScoringError>) -> Self {
        Self {
            eval_id: request.eval_id.clone(),
            generation: request.generation,
            outcome,
        }
    }

    #[must_use]
    pub fn success(request: &ScoringRequest, answer: impl Into<String>, model_score: Score) -> Self {
        Self::new(
            request,
            Ok(ScoredAnswer {
                answer: answer.into(),
                model_score,
            }),
        )
    }

    #[must_use]
    pub fn failure(request: &ScoringRequest, error: ScoringError) -> Self {
        Self::new(request, Err(error))
    }
}
