//! Capability traits for the external reasoning services.
//!
//! The pipeline only ever talks to these four traits, so any backend (an LLM,
//! a rules engine, a canned fake in tests) can sit behind them.

use async_trait::async_trait;

use crate::models::{Classification, ConversationHistory, Plan};
use crate::types::AppResult;

/// Decide what kind of request the latest message is.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, history: &ConversationHistory, latest: &str) -> AppResult<Classification>;
}

/// Break an instruction into an ordered plan of operations.
#[async_trait]
pub trait Decompose: Send + Sync {
    async fn decompose(&self, instruction: &str) -> AppResult<Plan>;
}

/// Produce creative content for a brief.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, brief: &str) -> AppResult<String>;
}

/// Return a text digest of web results for a query.
#[async_trait]
pub trait Search: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<String>;
}
