//! Drives evaluators over runs and stores the resulting feedback

use super::options::EvaluateOptions;
use super::summary::{EvaluationSummary, RunOutcome};
use crate::evaluator::RunEvaluator;
use futures::StreamExt;
use std::sync::Arc;
use tracery_core::Client;
use tracery_core::config::DEFAULT_PAGE_SIZE;
use tracery_core::error::{TraceError, TraceResult};
use tracery_core::pagination::PageStream;
use tracery_core::schemas::{Example, Feedback, FeedbackCreate, FeedbackSource, Run};
use tracery_core::store::{RunStore, load_child_runs};
use tracing::{debug, info, warn};

/// Evaluates runs against their reference examples and records feedback.
///
/// No retries and no deduplication: every call stores a new feedback record.
#[derive(Clone)]
pub struct EvaluationRunner {
    store: Arc<dyn RunStore>,
    page_size: usize,
}

impl EvaluationRunner {
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Runner over the client's store, using its page size for child loading
    pub fn from_client(client: &Client) -> Self {
        Self {
            store: client.run_store(),
            page_size: client.config().page_size,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Reference example of a run; an unreadable example counts as none
    async fn reference_example(&self, run: &Run) -> Option<Example> {
        let example_id = run.reference_example_id?;
        match self.store.read_example(example_id).await {
            Ok(example) => Some(example),
            Err(e) => {
                warn!(
                    "Could not read reference example {} of run {}: {}",
                    example_id, run.id, e
                );
                None
            }
        }
    }

    /// Grade one run and store the feedback.
    ///
    /// # Errors
    ///
    /// Returns the evaluator's error, a child-loading error, or the store's
    /// error when creating the feedback. A missing reference example is not
    /// an error.
    pub async fn evaluate_run(
        &self,
        run: &Run,
        evaluator: &dyn RunEvaluator,
        options: &EvaluateOptions,
    ) -> TraceResult<Feedback> {
        let example = self.reference_example(run).await;

        let mut loaded;
        let run = if options.load_child_runs {
            loaded = run.clone();
            load_child_runs(&self.store, &mut loaded, self.page_size).await?;
            &loaded
        } else {
            run
        };

        let result = evaluator.evaluate_run(run, example.as_ref()).await?;

        let mut metadata = options.source_info.clone();
        metadata.extend(result.evaluator_info);
        let mut feedback = FeedbackCreate::new(run.id, result.key)
            .with_source(FeedbackSource::model(metadata));
        feedback.score = result.score;
        feedback.value = result.value;
        feedback.comment = result.comment;
        feedback.correction = result.correction;

        let stored = self.store.create_feedback(&feedback).await?;
        debug!(
            "Stored feedback {} ({}) for run {}",
            stored.id, stored.key, run.id
        );
        Ok(stored)
    }

    /// Evaluate every run a cursor yields.
    ///
    /// Up to `options.max_concurrency` evaluations run at once and outcomes
    /// keep cursor order. A failed evaluation is recorded and iteration
    /// continues; a cursor error stops iteration and is kept in the summary.
    pub async fn evaluate_runs(
        &self,
        runs: PageStream<Run>,
        evaluator: &dyn RunEvaluator,
        options: &EvaluateOptions,
    ) -> EvaluationSummary {
        let concurrency = options.max_concurrency.max(1);
        let mut outcomes = runs
            .map(|item| async move {
                let run = item?;
                let result = self.evaluate_run(&run, evaluator, options).await;
                if let Err(e) = &result {
                    warn!("Evaluator '{}' failed on run {}: {}", evaluator.name(), run.id, e);
                }
                Ok::<_, TraceError>(RunOutcome {
                    run_id: run.id,
                    result,
                })
            })
            .buffered(concurrency);

        let mut summary = EvaluationSummary::default();
        while let Some(next) = outcomes.next().await {
            match next {
                Ok(outcome) => summary.outcomes.push(outcome),
                Err(e) => {
                    warn!("Run cursor failed, stopping evaluation: {}", e);
                    summary.cursor_error = Some(e);
                    break;
                }
            }
        }

        info!(
            "Evaluator '{}' finished: {} succeeded, {} failed",
            evaluator.name(),
            summary.succeeded(),
            summary.failed()
        );
        summary
    }
}
