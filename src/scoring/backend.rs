//! Scoring backend abstraction.
//!
//! This module defines the [`Scorer`] trait, the seam between the lifecycle
//! engine and whatever produces answers and model scores. The console ships a
//! [`SimulatedScorer`](super::SimulatedScorer); a real generation service
//! plugs in by implementing the same trait.
//!
//! # Design Philosophy
//!
//! The trait has one method per request. Batching, concurrency and commit
//! atomicity are handled by the caller, so implementations only decide how to
//! answer a single question and how to report failure.

use super::messages::{ScoredAnswer, ScoringRequest};
use futures_util::future::BoxFuture;
use thiserror::Error;

/// Per-request scoring failure.
///
/// A failure leaves its entry pending with the message attached; it never
/// affects other entries in the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The backend could not produce a result.
    #[error("scoring backend error: {0}")]
    Backend(String),

    /// The backend replied without answer text.
    #[error("scoring backend returned an empty answer")]
    EmptyAnswer,
}

/// Produces an answer and an initial model score for a pending entry.
///
/// Implementations must be safe to call concurrently for different requests.
/// Timeouts and retries are the implementation's concern; the returned future
/// must eventually settle.
///
/// # Examples
///
/// ```
/// use eval_console::domain::Score;
/// use eval_console::scoring::{ScoredAnswer, Scorer, ScoringError, ScoringRequest};
/// use futures_util::future::BoxFuture;
///
/// struct Fixed;
///
/// impl Scorer for Fixed {
///     fn score<'a>(
///         &'a self,
///         request: &'a ScoringRequest,
///     ) -> BoxFuture<'a, Result<ScoredAnswer, ScoringError>> {
///         Box::pin(async move {
///             Ok(ScoredAnswer {
///                 answer: format!("answer to {}", request.content),
///                 model_score: Score::MAX,
///             })
///         })
///     }
/// }
/// ```
pub trait Scorer: Send + Sync {
    /// Answers and scores one request.
    fn score<'a>(
        &'a self,
        request: &'a ScoringRequest,
    ) -> BoxFuture<'a, Result<ScoredAnswer, ScoringError>>;
}
