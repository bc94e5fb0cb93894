//! Character-set Jaccard similarity grading

use super::types::{Grader, GradingInput, GradingOutput};
use async_trait::async_trait;
use std::collections::HashSet;
use tracery_core::error::TraceResult;

/// Default score a prediction must exceed to count as correct
pub const DEFAULT_JACCARD_THRESHOLD: f64 = 0.9;

fn char_set(text: &str) -> HashSet<char> {
    text.trim().to_lowercase().chars().collect()
}

/// Jaccard similarity of the character sets of two strings.
///
/// Both strings are trimmed and lowercased first. Two empty sets score 1.0.
///
/// ```
/// use tracery_eval::evaluator::jaccard_chars;
///
/// assert_eq!(jaccard_chars("abcd", "bcde"), 0.6);
/// assert_eq!(jaccard_chars(" ABC ", "cba"), 1.0);
/// ```
pub fn jaccard_chars(prediction: &str, answer: &str) -> f64 {
    let prediction = char_set(prediction);
    let answer = char_set(answer);
    let union = prediction.union(&answer).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = prediction.intersection(&answer).count();
    intersection as f64 / union as f64
}

/// Grades by [`jaccard_chars`] against a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JaccardGrader {
    pub threshold: f64,
}

impl JaccardGrader {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for JaccardGrader {
    fn default() -> Self {
        Self::new(DEFAULT_JACCARD_THRESHOLD)
    }
}

#[async_trait]
impl Grader for JaccardGrader {
    async fn grade(&self, input: &GradingInput) -> TraceResult<GradingOutput> {
        let Some(answer) = &input.answer else {
            return Ok(GradingOutput::ambiguous());
        };
        let score = jaccard_chars(&input.prediction, answer);
        Ok(GradingOutput::verdict(score, score > self.threshold))
    }
}
