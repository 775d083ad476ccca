// Deskpilot - routes natural-language requests into local file, browser and app operations

pub mod config;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod search;     // Web search (Bocha) used when a request asks for it
pub mod operations; // The fixed operation set and its registry
pub mod executor;
pub mod report;
pub mod pipeline;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use executor::PlanExecutor;
pub use pipeline::{Capabilities, Pipeline};
pub use report::ReportBuilder;
pub use types::{AppError, AppResult};
