//! Recursive loading of a run's descendants

use super::filters::RunFilter;
use super::trait_def::RunStore;
use crate::error::TraceResult;
use crate::pagination::{PageRequest, paginate};
use crate::schemas::Run;
use futures::TryStreamExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::debug;

/// Populate `run.child_runs` with its descendants, depth first.
///
/// Children are listed with a `parent_run_id` filter and sorted by execution
/// order so the tree reads in the order it ran.
pub fn load_child_runs<'a>(
    store: &'a Arc<dyn RunStore>,
    run: &'a mut Run,
    page_size: usize,
) -> BoxFuture<'a, TraceResult<()>> {
    Box::pin(async move {
        let filter = RunFilter::new().parent_run_id(run.id);
        let lister = Arc::clone(store);
        let mut children: Vec<Run> = paginate(PageRequest::first(page_size), move |page| {
            let lister = Arc::clone(&lister);
            let filter = filter.clone();
            async move { lister.list_runs(&filter, page).await }
        })
        .try_collect()
        .await?;

        children.sort_by_key(|child| child.execution_order);
        for child in children.iter_mut() {
            load_child_runs(store, child, page_size).await?;
        }
        debug!("Loaded {} child runs for {}", children.len(), run.id);
        run.child_runs = Some(children);
        Ok(())
    })
}
