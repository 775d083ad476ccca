//! Search Module
//!
//! Web search used to enrich requests that explicitly ask for it.
//! Uses the Bocha web-search API as the backend.

pub mod bocha;

pub use bocha::{BochaClient, WebPage};

use thiserror::Error;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search API key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}
