//! Scoring collaborator for batch processing.
//!
//! Batch processing needs an answer and an initial model score for every
//! pending evaluation entry. This module defines the boundary to whatever
//! provides them.
//!
//! # Architecture
//!
//! ```text
//! lifecycle::scoring_requests → ScoringRequest[] → score_all(Scorer) → ScoringResult[]
//!                                                                        ↓
//!                                                    lifecycle::apply_scoring (one commit)
//! ```
//!
//! # Modules
//!
//! - `backend`: The [`Scorer`] trait and [`ScoringError`]
//! - `messages`: Request/result types with trace context propagation
//! - `dispatch`: Concurrent, failure-isolated execution of a batch
//! - `simulated`: Built-in backend producing templated answers and random scores

pub mod backend;
pub mod dispatch;
pub mod messages;
pub mod simulated;

pub use backend::{Scorer, ScoringError};
pub use dispatch::score_all;
pub use messages::{ScoredAnswer, ScoringRequest, ScoringResult, TraceContext};
pub use simulated::{ScorerConfig, SimulatedScorer};
