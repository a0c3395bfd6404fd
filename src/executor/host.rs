//! Runs runtime commands as child processes of this one.

use super::{CommandExecutor, ExecutionCommand, ExecutionResult, ExecutorError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Spawns `docker`/`podman` on the host and waits for it to exit
#[derive(Debug, Clone, Default)]
pub struct HostExecutor;

impl HostExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for HostExecutor {
    async fn execute(&self, cmd: ExecutionCommand) -> Result<ExecutionResult, ExecutorError> {
        debug!("spawning: {}", cmd.display_line());
        let started = Instant::now();

        // The child is killed if the timeout drops the pending output future.
        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let pending = command.output();

        let output = match cmd.timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| ExecutorError::Timeout(limit))?,
            None => pending.await,
        }
        .map_err(|source| ExecutorError::Spawn {
            program: cmd.program.clone(),
            source,
        })?;

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal: no code to report
            exit_code: output.status.code().unwrap_or(-1),
            duration: started.elapsed(),
        })
    }

    fn executor_type(&self) -> &'static str {
        "host"
    }
}
