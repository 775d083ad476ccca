//! Operations
//!
//! The fixed capability set a plan can use, and the registry the executor
//! dispatches through:
//!
//! - `files` - create, delete, read, rename and append on the local filesystem
//! - `launcher` - open a website in the default browser, launch an application
//! - `registry` - maps each [`OperationKind`](crate::models::OperationKind) to its handler
//!
//! Handlers never return errors. Every failure becomes a
//! [`StepResult`](crate::models::StepResult) with `success: false`.

pub mod context;
pub mod files;
pub mod launcher;
pub mod registry;

pub use context::OperationContext;
pub use launcher::{Launcher, Platform, SystemLauncher};
pub use registry::{OperationHandler, OperationRegistry};
