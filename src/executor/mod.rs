//! # Command Execution Abstraction Layer
//!
//! Every interaction with the container runtime is a child process. This module
//! puts process spawning behind the [`CommandExecutor`] trait so the lifecycle
//! state machine and the listing parser can be exercised without a live runtime.
//!
//! ## Core Components
//!
//! - **[`CommandExecutor`]**: capability trait for running one command to completion
//! - **[`HostExecutor`]**: spawns real processes via `tokio::process::Command`
//! - **[`ScriptedExecutor`]**: scriptable stub answering from canned results
//! - **[`ExecutionCommand`]**: program, arguments and optional timeout
//! - **[`ExecutionResult`]**: stdout, stderr, exit code and duration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use db_container::executor::{CommandExecutor, ExecutionCommand, HostExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = HostExecutor::new();
//!
//!     let command = ExecutionCommand::new("docker", vec!["ps".to_string()]);
//!
//!     let result = executor.execute(command).await?;
//!     println!("Exit code: {}", result.exit_code);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::time::Duration;

/// Host-based command execution.
///
/// Implements [`HostExecutor`] for direct process execution on the
/// host system using `tokio::process::Command`.
pub mod host;

/// Scriptable stand-in for the host executor.
pub mod scripted;

pub use host::HostExecutor;
pub use scripted::ScriptedExecutor;

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
    /// Exit code (0 = success, non-zero = failure)
    pub exit_code: i32,
    /// Duration of command execution
    pub duration: Duration,
}

impl ExecutionResult {
    /// Successful result carrying the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::ZERO,
        }
    }

    /// Failed result with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
            duration: Duration::ZERO,
        }
    }

    /// Check if the command executed successfully (exit code 0)
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Command to execute
#[derive(Debug, Clone)]
pub struct ExecutionCommand {
    /// Program name or path to execute
    pub program: String,
    /// Command line arguments
    pub args: Vec<String>,
    /// Maximum execution time (None = no timeout)
    pub timeout: Option<Duration>,
}

impl ExecutionCommand {
    /// Create a new command with just program and args
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Set execution timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shell-escaped command line, used for logging and error messages.
    pub fn display_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_escape::escape(part.as_str().into()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Errors during command execution
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Command could not be spawned
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Command execution timed out
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Runs one command to completion.
///
/// Implementations must not interpret exit codes; a non-zero exit is returned as
/// an [`ExecutionResult`] and judged by the caller.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and return the result
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn execute(&self, command: ExecutionCommand) -> Result<ExecutionResult, ExecutorError>;

    /// Get executor type name for logging
    fn executor_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_line_escapes_format_argument() {
        let cmd = ExecutionCommand::new(
            "docker",
            vec![
                "ps".to_string(),
                "-a".to_string(),
                "--format".to_string(),
                "{{.ID}}|{{.Names}}".to_string(),
            ],
        );

        assert_eq!(cmd.display_line(), "docker ps -a --format '{{.ID}}|{{.Names}}'");
    }

    #[test]
    fn test_execution_result_helpers() {
        assert!(ExecutionResult::ok("out").success());

        let failed = ExecutionResult::failed(125, "boom");
        assert!(!failed.success());
        assert_eq!(failed.exit_code, 125);
        assert_eq!(failed.stderr, "boom");
    }
}
