//! Tracery Core Library
//!
//! Client-side building blocks for recording traced executions and grading
//! them: run trees that persist themselves to a store, lazy paged listing,
//! the store contract with HTTP and in-memory implementations, and the
//! configuration and error types shared by the other crates.

pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod run_tree;
pub mod schemas;
pub mod store;

// Re-export commonly used types
pub use client::Client;
pub use config::{ClientConfig, LoggingConfig};
pub use error::{TraceError, TraceResult};
pub use pagination::{Page, PageRequest, PageStream};
pub use run_tree::{RunTree, RunTreeConfig};
pub use schemas::*;
pub use store::{CatalogStore, HttpStore, MemoryStore, RunStore};
