//! Filesystem operations: create, delete, read, rename, append.
//!
//! "Not found" failures are reported with their own message so a missing file
//! is never confused with a generic I/O error.

use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::models::{OperationKind, OperationSpec, StepResult};
use crate::operations::context::OperationContext;
use crate::operations::registry::{mismatched, OperationHandler};

pub struct CreateFileHandler;
pub struct DeleteFileHandler;
pub struct ReadFileHandler;
pub struct RenameFileHandler;
pub struct AppendFileHandler;

#[async_trait]
impl OperationHandler for CreateFileHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::CreateFile
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::CreateFile { filename, content } = spec else {
            return mismatched(self.kind(), spec);
        };
        let path = ctx.resolve(filename);
        debug!(path = %path.display(), "Creating file");

        // Truncates an existing file
        match tokio::fs::write(&path, content).await {
            Ok(()) => StepResult::ok(format!("File {} created and content written", filename)),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Create failed");
                StepResult::failed(format!("Failed to create file {}: {}", filename, e))
            }
        }
    }
}

#[async_trait]
impl OperationHandler for DeleteFileHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::DeleteFile
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::DeleteFile { filename } = spec else {
            return mismatched(self.kind(), spec);
        };
        let path = ctx.resolve(filename);
        debug!(path = %path.display(), "Deleting file");

        match tokio::fs::remove_file(&path).await {
            Ok(()) => StepResult::ok(format!("File {} deleted", filename)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                StepResult::failed(format!("File {} not found, cannot delete", filename))
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Delete failed");
                StepResult::failed(format!("Failed to delete file {}: {}", filename, e))
            }
        }
    }
}

#[async_trait]
impl OperationHandler for ReadFileHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::ReadFile
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::ReadFile { filename } = spec else {
            return mismatched(self.kind(), spec);
        };
        let path = ctx.resolve(filename);
        debug!(path = %path.display(), "Reading file");

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => StepResult::ok(format!("Contents of file {}:\n{}", filename, content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                StepResult::failed(format!("File {} not found, cannot read", filename))
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Read failed");
                StepResult::failed(format!("Failed to read file {}: {}", filename, e))
            }
        }
    }
}

#[async_trait]
impl OperationHandler for RenameFileHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::RenameFile
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::RenameFile { filename, new_filename } = spec else {
            return mismatched(self.kind(), spec);
        };
        if new_filename.trim().is_empty() {
            return StepResult::failed("No new filename specified, cannot rename");
        }

        let from = ctx.resolve(filename);
        let to = ctx.resolve(new_filename);
        debug!(from = %from.display(), to = %to.display(), "Renaming file");

        match tokio::fs::try_exists(&from).await {
            Ok(true) => {}
            Ok(false) => {
                return StepResult::failed(format!("File {} not found, cannot rename", filename));
            }
            Err(e) => {
                return StepResult::failed(format!("Failed to rename file {}: {}", filename, e));
            }
        }

        match tokio::fs::rename(&from, &to).await {
            Ok(()) => StepResult::ok(format!("File {} renamed to {}", filename, new_filename)),
            Err(e) => {
                warn!(error = %e, from = %from.display(), "Rename failed");
                StepResult::failed(format!("Failed to rename file {}: {}", filename, e))
            }
        }
    }
}

#[async_trait]
impl OperationHandler for AppendFileHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::AppendFile
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::AppendFile { filename, content } = spec else {
            return mismatched(self.kind(), spec);
        };
        let path = ctx.resolve(filename);
        debug!(path = %path.display(), "Appending to file");

        let opened = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await;

        let result = match opened {
            Ok(mut file) => match file.write_all(content.as_bytes()).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => StepResult::ok(format!("Content appended to file {}", filename)),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Append failed");
                StepResult::failed(format!("Failed to append to file {}: {}", filename, e))
            }
        }
    }
}
