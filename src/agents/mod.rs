//! Agent System
//!
//! LLM-backed implementations of the capabilities the pipeline consumes:
//!
//! - **Divider**: classifies a request as instruction, question, or creative instruction
//! - **Commander**: decomposes an instruction into an ordered operation plan
//! - **Writer**: generates creative content for hybrid requests
//!
//! ## Pipeline Overview
//!
//! ```text
//! User Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Divider   │  → instruction / question / creative+instruction
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Writer    │  → content (creative requests only)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  → ordered operations
//! └─────────────┘
//!      │
//!      ▼
//!  Plan Executor
//! ```

use serde::de::DeserializeOwned;

pub mod capabilities;
pub mod commander;
pub mod divider;
pub mod writer;

pub use capabilities::{Classify, Decompose, Generate, Search};
pub use commander::CommanderAgent;
pub use divider::DividerAgent;
pub use writer::WriterAgent;

/// Deserialize an LLM answer. The answer is parsed as-is first, so fences
/// that appear inside JSON string values are left alone; only when that fails
/// is an outer markdown code fence stripped.
pub(crate) fn parse_llm_json<T: DeserializeOwned>(response: &str) -> Result<T, serde_json::Error> {
    let trimmed = response.trim();
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(e) => match strip_code_fence(trimmed) {
            Some(body) => serde_json::from_str(body),
            None => Err(e),
        },
    }
}

/// Body between the first opening fence and the last closing fence
fn strip_code_fence(response: &str) -> Option<&str> {
    let (_, rest) = response
        .split_once("```json")
        .or_else(|| response.split_once("```"))?;
    let body = match rest.rsplit_once("```") {
        Some((body, _)) => body,
        None => rest,
    };
    Some(body.trim())
}
