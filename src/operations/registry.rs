use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{OperationKind, OperationSpec, StepResult};
use crate::operations::context::OperationContext;
use crate::operations::files::{
    AppendFileHandler, CreateFileHandler, DeleteFileHandler, ReadFileHandler, RenameFileHandler,
};
use crate::operations::launcher::{OpenAppHandler, OpenWebsiteHandler};

/// Executes exactly one operation of its kind. Must not panic or return early
/// with an error; every failure is a `StepResult` with `success: false`.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    fn kind(&self) -> OperationKind;

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult;
}

/// Result for a spec handed to the wrong handler
pub(crate) fn mismatched(kind: OperationKind, spec: &OperationSpec) -> StepResult {
    StepResult::failed(format!(
        "Malformed operation: {} handler cannot execute {}",
        kind,
        spec.label()
    ))
}

#[derive(Clone, Default)]
pub struct OperationRegistry {
    handlers: HashMap<OperationKind, Arc<dyn OperationHandler>>,
}

impl OperationRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All seven built-in operations
    pub fn with_defaults() -> Self {
        Self::empty()
            .register(Arc::new(CreateFileHandler))
            .register(Arc::new(DeleteFileHandler))
            .register(Arc::new(ReadFileHandler))
            .register(Arc::new(RenameFileHandler))
            .register(Arc::new(AppendFileHandler))
            .register(Arc::new(OpenWebsiteHandler))
            .register(Arc::new(OpenAppHandler))
    }

    /// Add a handler, replacing any existing one for the same kind
    pub fn register(mut self, handler: Arc<dyn OperationHandler>) -> Self {
        self.handlers.insert(handler.kind(), handler);
        self
    }

    pub fn without(mut self, kind: OperationKind) -> Self {
        self.handlers.remove(&kind);
        self
    }

    pub fn lookup(&self, kind: OperationKind) -> Option<Arc<dyn OperationHandler>> {
        self.handlers.get(&kind).cloned()
    }
}
