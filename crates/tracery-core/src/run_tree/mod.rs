//! In-memory run hierarchies and their persistence
//!
//! A [`RunTree`] tracks one root execution and its descendants. Runs are built
//! and mutated locally, then created with [`RunTree::post`] and finalized with
//! [`RunTree::patch`]. Each run serializes its own remote calls so the store
//! never sees an update before the create it depends on.

mod arena;
mod config;
mod tree;


pub use config::RunTreeConfig;
pub use tree::RunTree;
