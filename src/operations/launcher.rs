//! Browser and application launching.
//!
//! Both operations are fire-and-forget: the child process is spawned and the
//! step succeeds once the spawn does. Nothing waits for the browser or app to
//! finish starting.

use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

use crate::models::{OperationKind, OperationSpec, StepResult};
use crate::operations::context::OperationContext;
use crate::operations::registry::{mismatched, OperationHandler};

/// Operating-system family, which decides how browsers and apps are opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }
}

/// Spawns detached processes. Swapped for a recording fake in tests.
pub trait Launcher: Send + Sync {
    fn spawn(&self, program: &str, args: &[&str]) -> io::Result<()>;
}

pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn spawn(&self, program: &str, args: &[&str]) -> io::Result<()> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        reap_in_background(child);
        Ok(())
    }
}

/// Wait for a launched child off the caller's path so it never lingers as a
/// zombie in a long-running host. The step itself does not wait.
fn reap_in_background(mut child: Child) {
    let pid = child.id();
    let reap = move || match child.wait() {
        Ok(status) => debug!(pid, %status, "Launched process exited"),
        Err(e) => warn!(pid, error = %e, "Failed to wait for launched process"),
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(reap);
        }
        Err(_) => {
            std::thread::spawn(reap);
        }
    }
}

pub struct OpenWebsiteHandler;
pub struct OpenAppHandler;

#[async_trait]
impl OperationHandler for OpenWebsiteHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::OpenWebsite
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::OpenWebsite { url } = spec else {
            return mismatched(self.kind(), spec);
        };
        if url.trim().is_empty() {
            return StepResult::failed("No URL specified, cannot open website");
        }

        let spawned = match &ctx.platform {
            // The empty string is the window title `start` expects before the target
            Platform::Windows => ctx.launcher.spawn("cmd", &["/C", "start", "", url.as_str()]),
            Platform::MacOs => ctx.launcher.spawn("open", &[url.as_str()]),
            // Other Unix desktops (BSDs, illumos) ship xdg-open as well
            Platform::Linux | Platform::Other(_) => ctx.launcher.spawn("xdg-open", &[url.as_str()]),
        };

        match spawned {
            Ok(()) => {
                debug!(url = %url, "Browser launch requested");
                StepResult::ok(format!("Opened website: {}", url))
            }
            Err(e) => {
                warn!(error = %e, url = %url, "Browser launch failed");
                StepResult::failed(format!("Failed to open website {}: {}", url, e))
            }
        }
    }
}

#[async_trait]
impl OperationHandler for OpenAppHandler {
    fn kind(&self) -> OperationKind {
        OperationKind::OpenApp
    }

    async fn execute(&self, spec: &OperationSpec, ctx: &OperationContext) -> StepResult {
        let OperationSpec::OpenApp { target } = spec else {
            return mismatched(self.kind(), spec);
        };
        if target.trim().is_empty() {
            return StepResult::failed("No application specified, cannot open app");
        }

        let resolved = ctx.apps.resolve(target).unwrap_or(target.as_str());
        debug!(target = %target, resolved = %resolved, platform = ?ctx.platform, "Opening app");

        let spawned = match &ctx.platform {
            Platform::Windows => {
                if !Path::new(resolved).exists() {
                    return StepResult::failed(format!(
                        "App not found at {}, check that it is installed",
                        resolved
                    ));
                }
                ctx.launcher.spawn(resolved, &[])
            }
            Platform::MacOs => ctx.launcher.spawn("open", &["-a", resolved]),
            Platform::Linux => ctx.launcher.spawn(resolved, &[]),
            Platform::Other(os) => {
                return StepResult::failed(format!("Unsupported operating system: {}", os));
            }
        };

        match spawned {
            Ok(()) => StepResult::ok(format!("Opened app: {}", resolved)),
            Err(e) if e.kind() == ErrorKind::NotFound => StepResult::failed(format!(
                "App {} not found, check that it is installed",
                resolved
            )),
            Err(e) => {
                warn!(error = %e, target = %resolved, "App launch failed");
                StepResult::failed(format!("Failed to open app {}: {}", resolved, e))
            }
        }
    }
}
