// src/lib.rs
pub mod api;
pub mod config;
pub mod engine;
pub mod query;

pub use query::{Intent, IntentParser, QueryParams, QueryResult};
