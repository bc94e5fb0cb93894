//! Evaluator built from a grading function over plain strings

use super::exact_match::exact_match;
use super::jaccard::JaccardGrader;
use super::types::{EvaluationResult, Grader, GradingInput, RunEvaluator};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracery_core::error::{TraceError, TraceResult};
use tracery_core::schemas::{Example, KvMap, Run};

/// Default key for the run input, the prediction and the answer
pub const DEFAULT_INPUT_KEY: &str = "input";
pub const DEFAULT_PREDICTION_KEY: &str = "output";
pub const DEFAULT_ANSWER_KEY: &str = "output";

/// Adapts a [`Grader`] to the [`RunEvaluator`] contract.
///
/// The grader sees `run.inputs[input_key]`, `run.outputs[prediction_key]` and
/// `example.outputs[answer_key]`. Strings are passed verbatim and any other
/// JSON value as its JSON text.
///
/// # Examples
///
/// ```
/// use tracery_eval::evaluator::{GradingInput, GradingOutput, StringEvaluator};
///
/// let evaluator = StringEvaluator::new("length", |input: &GradingInput| {
///     Ok(GradingOutput {
///         score: Some(input.prediction.len() as f64),
///         ..Default::default()
///     })
/// });
/// assert_eq!(evaluator.answer_key(), Some("output"));
/// ```
#[derive(Clone)]
pub struct StringEvaluator {
    name: String,
    grader: Arc<dyn Grader>,
    input_key: String,
    prediction_key: String,
    answer_key: Option<String>,
    evaluator_info: KvMap,
}

impl std::fmt::Debug for StringEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringEvaluator")
            .field("name", &self.name)
            .field("input_key", &self.input_key)
            .field("prediction_key", &self.prediction_key)
            .field("answer_key", &self.answer_key)
            .finish_non_exhaustive()
    }
}

impl StringEvaluator {
    pub fn new(name: impl Into<String>, grader: impl Grader + 'static) -> Self {
        Self {
            name: name.into(),
            grader: Arc::new(grader),
            input_key: DEFAULT_INPUT_KEY.to_string(),
            prediction_key: DEFAULT_PREDICTION_KEY.to_string(),
            answer_key: Some(DEFAULT_ANSWER_KEY.to_string()),
            evaluator_info: KvMap::new(),
        }
    }

    /// Jaccard evaluator with the default threshold, keyed `jaccard`
    pub fn jaccard() -> Self {
        Self::new("jaccard", JaccardGrader::default())
    }

    /// Exact-match evaluator keyed `exact_match`
    pub fn exact_match() -> Self {
        Self::new("exact_match", exact_match)
    }

    pub fn with_input_key(mut self, key: impl Into<String>) -> Self {
        self.input_key = key.into();
        self
    }

    pub fn with_prediction_key(mut self, key: impl Into<String>) -> Self {
        self.prediction_key = key.into();
        self
    }

    /// Key read from the example outputs; `None` grades without answers
    pub fn with_answer_key(mut self, key: Option<String>) -> Self {
        self.answer_key = key;
        self
    }

    /// Metadata attached to every result
    pub fn with_evaluator_info(mut self, info: KvMap) -> Self {
        self.evaluator_info = info;
        self
    }

    pub fn answer_key(&self) -> Option<&str> {
        self.answer_key.as_deref()
    }

    fn grading_input(&self, run: &Run, example: Option<&Example>) -> TraceResult<GradingInput> {
        let outputs = run.outputs.as_ref().ok_or_else(|| {
            TraceError::evaluator(&self.name, format!("Run {} has no outputs", run.id))
        })?;
        let prediction = outputs
            .get(&self.prediction_key)
            .map(render)
            .ok_or_else(|| {
                TraceError::evaluator(
                    &self.name,
                    format!(
                        "Run {} outputs have no '{}' key",
                        run.id, self.prediction_key
                    ),
                )
            })?;
        let input = run.inputs.get(&self.input_key).map(render).unwrap_or_default();
        let answer = self.answer_key.as_ref().and_then(|key| {
            example
                .and_then(|e| e.outputs.as_ref())
                .and_then(|outputs| outputs.get(key))
                .filter(|value| !value.is_null())
                .map(render)
        });

        Ok(GradingInput {
            input,
            prediction,
            answer,
        })
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RunEvaluator for StringEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate_run(
        &self,
        run: &Run,
        example: Option<&Example>,
    ) -> TraceResult<EvaluationResult> {
        let input = self.grading_input(run, example)?;
        let output = self.grader.grade(&input).await?;
        Ok(EvaluationResult {
            key: self.name.clone(),
            score: output.score,
            value: output.value,
            comment: output.comment,
            correction: None,
            evaluator_info: self.evaluator_info.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::types::{AMBIGUOUS, CORRECT, GradingOutput, INCORRECT};
    use chrono::Utc;
    use serde_json::json;
    use tracery_core::schemas::{RunCreate, RunType};
    use uuid::Uuid;

    fn kv(value: Value) -> KvMap {
        value.as_object().cloned().unwrap()
    }

    fn run_with(outputs: Option<Value>) -> Run {
        let mut run = Run::from_create(
            RunCreate::new(Uuid::new_v4(), "root", RunType::Chain)
                .with_inputs(kv(json!({"input": "hello world"}))),
        );
        run.outputs = outputs.map(kv);
        run
    }

    fn example_with(outputs: Option<Value>) -> Example {
        Example {
            id: Uuid::new_v4(),
            dataset_id: Uuid::new_v4(),
            inputs: kv(json!({"input": "hello world"})),
            outputs: outputs.map(kv),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_jaccard_against_reference() {
        let result = StringEvaluator::jaccard()
            .evaluate_run(
                &run_with(Some(json!({"output": "abcd"}))),
                Some(&example_with(Some(json!({"output": "bcde"})))),
            )
            .await
            .unwrap();

        assert_eq!(result.key, "jaccard");
        assert_eq!(result.score, Some(0.6));
        assert_eq!(result.value.as_deref(), Some(INCORRECT));
    }

    #[tokio::test]
    async fn test_absent_answers_are_ambiguous() {
        let evaluator = StringEvaluator::jaccard();
        let run = run_with(Some(json!({"output": "abcd"})));

        for example in [
            None,
            Some(example_with(None)),
            Some(example_with(Some(json!({"other": "x"})))),
            Some(example_with(Some(json!({"output": null})))),
        ] {
            let result = evaluator.evaluate_run(&run, example.as_ref()).await.unwrap();
            assert_eq!(result.value.as_deref(), Some(AMBIGUOUS));
            assert_eq!(result.score, Some(-0.5));
        }
    }

    #[tokio::test]
    async fn test_run_without_outputs_is_an_error() {
        let err = StringEvaluator::jaccard()
            .evaluate_run(&run_with(None), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TraceError::Evaluator { ref evaluator, .. } if evaluator == "jaccard"));
    }

    #[tokio::test]
    async fn test_custom_keys_and_json_rendering() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let captured = seen.clone();
        let evaluator = StringEvaluator::new("capture", move |input: &GradingInput| {
            *captured.lock().unwrap() = Some(input.clone());
            Ok(GradingOutput::default())
        })
        .with_input_key("question")
        .with_prediction_key("answer")
        .with_answer_key(Some("expected".to_string()));

        let mut run = run_with(Some(json!({"answer": {"n": 4}})));
        run.inputs = kv(json!({"question": "2 + 2"}));
        let example = example_with(Some(json!({"expected": 4})));
        evaluator.evaluate_run(&run, Some(&example)).await.unwrap();

        let input = seen.lock().unwrap().clone().unwrap();
        assert_eq!(input.input, "2 + 2");
        assert_eq!(input.prediction, r#"{"n":4}"#);
        assert_eq!(input.answer.as_deref(), Some("4"));
    }

    /// Stands in for a grader that asks a model for its verdict
    struct ModelGrader;

    #[async_trait]
    impl Grader for ModelGrader {
        async fn grade(&self, input: &GradingInput) -> TraceResult<GradingOutput> {
            tokio::task::yield_now().await;
            let Some(answer) = &input.answer else {
                return Ok(GradingOutput::ambiguous());
            };
            let correct = input.prediction.eq_ignore_ascii_case(answer);
            Ok(GradingOutput::verdict(if correct { 1.0 } else { 0.0 }, correct))
        }
    }

    #[tokio::test]
    async fn test_async_grader() {
        let evaluator = StringEvaluator::new("model_judge", ModelGrader);
        let result = evaluator
            .evaluate_run(
                &run_with(Some(json!({"output": "Paris"}))),
                Some(&example_with(Some(json!({"output": "paris"})))),
            )
            .await
            .unwrap();

        assert_eq!(result.key, "model_judge");
        assert_eq!(result.score, Some(1.0));
        assert_eq!(result.value.as_deref(), Some(CORRECT));
    }

    #[tokio::test]
    async fn test_answer_key_disabled() {
        let evaluator = StringEvaluator::jaccard().with_answer_key(None);
        let result = evaluator
            .evaluate_run(
                &run_with(Some(json!({"output": "abcd"}))),
                Some(&example_with(Some(json!({"output": "abcd"})))),
            )
            .await
            .unwrap();
        assert_eq!(result.value.as_deref(), Some(AMBIGUOUS));
    }
}
