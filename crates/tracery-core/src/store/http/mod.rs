//! HTTP transport for the store traits

mod client;
mod query;

pub use client::HttpStore;
