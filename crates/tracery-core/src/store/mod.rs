//! Persistence contract for runs, feedback and the dataset catalog
//!
//! Two implementations ship with the crate: [`HttpStore`] for the remote
//! service and [`MemoryStore`] for tests and offline use.

mod child_runs;
pub mod filters;
mod http;
mod memory_store;
mod trait_def;

pub use child_runs::load_child_runs;
pub use filters::{DatasetFilter, ExampleFilter, FeedbackFilter, RunFilter};
pub use http::HttpStore;
pub use memory_store::{MemoryStore, OperationKind, StoreOperation};
#[cfg(test)]
pub use trait_def::MockRunStore;
pub use trait_def::{CatalogStore, RunStore};
