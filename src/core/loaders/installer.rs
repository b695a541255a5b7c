// ─── Installer Invoker ───
// Runs the Fabric installer jar as a child process and classifies the result.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::context::InstallContext;
use crate::core::error::{SetupError, SetupResult};

/// Wall-clock bound on one installer run.
pub const INSTALLER_TIMEOUT: Duration = Duration::from_secs(300);

const STDERR_TAIL_LINES: usize = 20;

#[async_trait]
pub trait InstallerRunner: Send + Sync {
    async fn run(&self, ctx: InstallContext<'_>) -> SetupResult<()>;
}

/// Runs `java -jar <installer> client ...`.
pub struct JavaInstallerRunner {
    java: PathBuf,
    timeout: Duration,
}

impl JavaInstallerRunner {
    pub fn new(java: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            timeout: INSTALLER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Arguments passed after the java executable.
pub fn installer_args(ctx: &InstallContext<'_>) -> Vec<OsString> {
    vec![
        "-jar".into(),
        ctx.installer_path.as_os_str().to_owned(),
        "client".into(),
        "-mcversion".into(),
        ctx.minecraft_version.into(),
        "-loader".into(),
        ctx.loader_version.into(),
        "-dir".into(),
        ctx.install_dir.as_os_str().to_owned(),
        "-noprofile".into(),
    ]
}

#[async_trait]
impl InstallerRunner for JavaInstallerRunner {
    async fn run(&self, ctx: InstallContext<'_>) -> SetupResult<()> {
        info!(
            "Running Fabric installer: loader {} for Minecraft {} into {:?}",
            ctx.loader_version, ctx.minecraft_version, ctx.install_dir
        );

        let mut cmd = Command::new(&self.java);
        cmd.args(installer_args(&ctx))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!("Command: {:?}", cmd);

        let child = cmd.spawn().map_err(|source| SetupError::InstallerLaunch {
            program: self.java.clone(),
            source,
        })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| SetupError::InstallerLaunch {
                program: self.java.clone(),
                source,
            })?,
            Err(_) => {
                warn!("Fabric installer timed out after {:?}", self.timeout);
                return Err(SetupError::InstallerTimeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("Installer stderr (tail):\n{}", tail_lines(&stderr, STDERR_TAIL_LINES));
            return Err(SetupError::InstallerExit {
                code: output.status.code(),
            });
        }

        info!("Fabric installer finished");
        Ok(())
    }
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
