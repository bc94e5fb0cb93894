use super::types::{GradingInput, GradingOutput};
use tracery_core::error::TraceResult;

/// Grades 1.0 when the trimmed prediction equals the trimmed answer, else 0.0
pub fn exact_match(input: &GradingInput) -> TraceResult<GradingOutput> {
    let Some(answer) = &input.answer else {
        return Ok(GradingOutput::ambiguous());
    };
    let matched = input.prediction.trim() == answer.trim();
    Ok(GradingOutput::verdict(if matched { 1.0 } else { 0.0 }, matched))
}
