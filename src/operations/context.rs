use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{AppCatalog, Config};
use crate::operations::launcher::{Launcher, Platform, SystemLauncher};

/// Local resources a handler may touch while executing one step.
#[derive(Clone)]
pub struct OperationContext {
    pub root: PathBuf,
    pub launcher: Arc<dyn Launcher>,
    pub apps: AppCatalog,
    pub platform: Platform,
}

impl OperationContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            launcher: Arc::new(SystemLauncher),
            apps: AppCatalog::default(),
            platform: Platform::current(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.workspace.root.clone()).with_apps(config.apps.clone())
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_apps(mut self, apps: AppCatalog) -> Self {
        self.apps = apps;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Relative names resolve against the workspace root; absolute paths pass through.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
