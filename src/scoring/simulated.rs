//! Simulated scoring backend.
//!
//! Stands in for a real generation service: answers with a templated text that
//! quotes the start of the question, and draws the model score uniformly from a
//! configured range (3-5 by default).

use super::backend::{Scorer, ScoringError};
use super::messages::{ScoredAnswer, ScoringRequest};
use crate::domain::Score;
use futures_util::future::BoxFuture;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of question characters quoted in a simulated answer.
const QUOTED_CHARS: usize = 10;

/// Score range for the simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Lowest model score the simulator assigns.
    pub min_score: u8,
    /// Highest model score the simulator assigns.
    pub max_score: u8,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            min_score: 3,
            max_score: 5,
        }
    }
}

/// Backend that fabricates answers and random model scores.
#[derive(Debug, Clone)]
pub struct SimulatedScorer {
    min: Score,
    max: Score,
}

impl SimulatedScorer {
    /// Creates a simulator for the configured range.
    ///
    /// Bounds saturate at 5 and are swapped if given in the wrong order.
    ///
    /// # Examples
    ///
    /// ```
    /// use eval_console::scoring::{ScorerConfig, SimulatedScorer};
    ///
    /// let scorer = SimulatedScorer::new(ScorerConfig { min_score: 9, max_score: 1 });
    /// assert_eq!(scorer.range(), (1, 5));
    /// ```
    #[must_use]
    pub fn new(config: ScorerConfig) -> Self {
        let a = Score::saturating(config.min_score);
        let b = Score::saturating(config.max_score);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Inclusive score bounds as plain numbers.
    #[must_use]
    pub fn range(&self) -> (u8, u8) {
        (self.min.value(), self.max.value())
    }

    fn compose_answer(request: &ScoringRequest) -> String {
        let quoted: String = request.content.chars().take(QUOTED_CHARS).collect();
        let origin = if request.is_knowledge_base {
            "the private knowledge base"
        } else {
            "the general model"
        };
        format!(
            "[Auto-generated answer] For your question about \"{quoted}...\", the system consulted \
             {origin} for an in-depth analysis. The revised answer should focus on logical \
             consistency and supporting data."
        )
    }
}

impl Default for SimulatedScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

impl Scorer for SimulatedScorer {
    fn score<'a>(
        &'a self,
        request: &'a ScoringRequest,
    ) -> BoxFuture<'a, Result<ScoredAnswer, ScoringError>> {
        let value = rand::thread_rng().gen_range(self.min.value()..=self.max.value());
        let answer = Self::compose_answer(request);

        tracing::trace!(eval_id = %request.eval_id, model_score = value, "simulated score drawn");

        Box::pin(std::future::ready(Ok(ScoredAnswer {
            answer,
            model_score: Score::saturating(value),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str, is_knowledge_base: bool) -> ScoringRequest {
        ScoringRequest {
            eval_id: "L1".to_string(),
            generation: 1,
            content: content.to_string(),
            is_knowledge_base,
            trace_context: None,
        }
    }

    #[tokio::test]
    async fn default_range_is_three_to_five() {
        let scorer = SimulatedScorer::default();
        let req = request("How do I rotate my API key?", false);

        for _ in 0..50 {
            let scored = scorer.score(&req).await.unwrap();
            assert!((3..=5).contains(&scored.model_score.value()));
            assert!(!scored.answer.is_empty());
        }
    }

    #[tokio::test]
    async fn answer_quotes_question_prefix_by_characters() {
        let scorer = SimulatedScorer::default();
        let req = request("报销流程需要哪些材料和审批步骤", true);

        let scored = scorer.score(&req).await.unwrap();

        assert!(scored.answer.contains("报销流程需要哪些材料..."));
        assert!(scored.answer.contains("private knowledge base"));
    }

    #[test]
    fn degenerate_range_is_allowed() {
        let scorer = SimulatedScorer::new(ScorerConfig {
            min_score: 4,
            max_score: 4,
        });
        assert_eq!(scorer.range(), (4, 4));
    }
}
