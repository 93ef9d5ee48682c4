//! External utility execution
//!
//! Data Pump runs as a separate program. The [`DumpRunner`] seam lets the
//! backup service be tested without the Oracle client tools installed.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use oradmin_common::{OradminError, Result};

/// Captured result of one utility run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait DumpRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// `Err` means the program could not be started at all; a non-zero exit
    /// is reported through [`CommandOutput::exit_code`].
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Spawns the utility directly, without a shell
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl DumpRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        // args carry the connect credential, only the program name is logged
        debug!(program, "Spawning utility");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                warn!(program, error = %e, "Failed to spawn utility");
                OradminError::Process(format!("No se pudo ejecutar {}: {}", program, e))
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };
        debug!(program, exit_code = result.exit_code, "Utility finished");
        Ok(result)
    }
}
