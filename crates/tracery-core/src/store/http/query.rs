//! Query-string construction for list endpoints

use crate::pagination::PageRequest;
use crate::store::filters::{DatasetFilter, ExampleFilter, FeedbackFilter, RunFilter};
use uuid::Uuid;

pub(super) type QueryParams = Vec<(&'static str, String)>;

fn push_page(params: &mut QueryParams, page: PageRequest) {
    params.push(("offset", page.offset.to_string()));
    params.push(("limit", page.limit.to_string()));
}

fn push_ids(params: &mut QueryParams, key: &'static str, ids: &Option<Vec<Uuid>>) {
    if let Some(ids) = ids {
        params.extend(ids.iter().map(|id| (key, id.to_string())));
    }
}

/// Parameters for `GET /runs`. `session_id` is the resolved project id, if
/// the filter named the project by name or id.
pub(super) fn run_params(
    filter: &RunFilter,
    session_id: Option<Uuid>,
    page: PageRequest,
) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(session_id) = session_id {
        params.push(("session", session_id.to_string()));
    }
    push_ids(&mut params, "id", &filter.ids);
    if let Some(order) = filter.execution_order {
        params.push(("execution_order", order.to_string()));
    }
    if let Some(error) = filter.error {
        params.push(("error", error.to_string()));
    }
    if let Some(parent) = filter.parent_run_id {
        params.push(("parent_run", parent.to_string()));
    }
    if let Some(run_type) = &filter.run_type {
        params.push(("run_type", run_type.as_str().to_string()));
    }
    if let Some(example_id) = filter.reference_example_id {
        params.push(("reference_example", example_id.to_string()));
    }
    push_page(&mut params, page);
    params
}

pub(super) fn feedback_params(filter: &FeedbackFilter, page: PageRequest) -> QueryParams {
    let mut params = QueryParams::new();
    push_ids(&mut params, "run", &filter.run_ids);
    if let Some(key) = &filter.key {
        params.push(("key", key.clone()));
    }
    push_page(&mut params, page);
    params
}

pub(super) fn dataset_params(filter: &DatasetFilter, page: PageRequest) -> QueryParams {
    let mut params = QueryParams::new();
    push_ids(&mut params, "id", &filter.ids);
    if let Some(name) = &filter.name {
        params.push(("name", name.clone()));
    }
    push_page(&mut params, page);
    params
}

pub(super) fn example_params(filter: &ExampleFilter, page: PageRequest) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(dataset_id) = filter.dataset_id {
        params.push(("dataset", dataset_id.to_string()));
    }
    push_ids(&mut params, "id", &filter.ids);
    push_page(&mut params, page);
    params
}

pub(super) fn page_params(page: PageRequest) -> QueryParams {
    let mut params = QueryParams::new();
    push_page(&mut params, page);
    params
}

/// Cut an error body down to something fit for a log line
pub(super) fn truncate_body(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
