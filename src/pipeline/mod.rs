//! Request pipeline
//!
//! ```text
//! latest message ──▶ IntentRouter ──▶ ContentBridge (creative only)
//!                         │
//!                         ▼
//!                     Decompose ──▶ PlanExecutor ──▶ ReportBuilder
//! ```
//!
//! A [`Pipeline`] holds no per-request state, so one instance can serve
//! concurrent requests. Requests that touch the same file are not serialized
//! against each other.

pub mod bridge;
pub mod orchestrator;
pub mod router;

pub use bridge::ContentBridge;
pub use orchestrator::{Capabilities, Pipeline};
pub use router::{IntentRouter, Route, RoutedRequest};
