//! Docker/Podman CLI wrapper.
//!
//! Builds the handful of runtime commands the lifecycle needs and turns
//! non-zero exits into [`ContainerError`]s. Every command is logged before it
//! runs so the operator can replay it by hand.

use crate::container::{ContainerError, LifecycleConfig, Result};
use crate::env;
use crate::executor::{CommandExecutor, ExecutionCommand, ExecutionResult, ExecutorError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Type of container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    /// Docker runtime
    Docker,
    /// Podman runtime
    Podman,
}

impl RuntimeType {
    /// Name of the CLI binary.
    pub fn binary(&self) -> &'static str {
        match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        }
    }

    /// Pick the first runtime found on `PATH`, preferring Docker.
    ///
    /// Falls back to Docker when neither is installed so the probe reports
    /// the failure.
    pub fn detect() -> Self {
        for runtime in [RuntimeType::Docker, RuntimeType::Podman] {
            if let Ok(path) = which::which(runtime.binary()) {
                debug!("Found {} at {}", runtime, path.display());
                return runtime;
            }
        }
        debug!("No container runtime found on PATH, defaulting to docker");
        RuntimeType::Docker
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "Docker"),
            RuntimeType::Podman => write!(f, "Podman"),
        }
    }
}

impl FromStr for RuntimeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docker" => Ok(RuntimeType::Docker),
            "podman" => Ok(RuntimeType::Podman),
            other => Err(format!(
                "unknown container runtime '{}', expected 'docker' or 'podman'",
                other
            )),
        }
    }
}

/// Runtime CLI client.
///
/// Cheap to clone; clones share the executor.
#[derive(Clone)]
pub struct ContainerClient {
    executor: Arc<dyn CommandExecutor>,
    runtime: RuntimeType,
}

impl ContainerClient {
    /// Create a client that runs `runtime` commands through `executor`.
    pub fn new(executor: Arc<dyn CommandExecutor>, runtime: RuntimeType) -> Self {
        Self { executor, runtime }
    }

    /// Check that the runtime is installed and its daemon answers `ps`.
    ///
    /// Not retried: a missing daemon needs the operator, not a backoff.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::RuntimeUnavailable`] if the command cannot be
    /// spawned, exits non-zero, or hangs past [`env::PROBE_TIMEOUT`].
    pub async fn verify_runtime_available(&self) -> Result<()> {
        let command = self.command(["ps"]).with_timeout(env::PROBE_TIMEOUT);
        info!("cmd: {}", command.display_line());

        match self.executor.execute(command).await {
            Ok(result) if result.success() => {
                debug!("{} is running", self.runtime);
                Ok(())
            }
            Ok(result) => Err(ContainerError::RuntimeUnavailable(format!(
                "{} ps exited with code {}: {}",
                self.runtime.binary(),
                result.exit_code,
                result.stderr.trim()
            ))),
            Err(ExecutorError::Spawn { program, source }) => Err(ContainerError::RuntimeUnavailable(
                format!("could not run '{}': {}", program, source),
            )),
            Err(ExecutorError::Timeout(limit)) => Err(ContainerError::RuntimeUnavailable(format!(
                "{} ps did not answer within {:?}",
                self.runtime.binary(),
                limit
            ))),
            Err(e) => Err(ContainerError::RuntimeUnavailable(e.to_string())),
        }
    }

    /// Run `ps -a --format <format>` and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn list_all(&self, format: &str) -> Result<String> {
        let result = self.run(self.command(["ps", "-a", "--format", format])).await?;
        Ok(result.stdout)
    }

    /// Start an existing, stopped container.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn start_container(&self, id: &str) -> Result<()> {
        self.run(self.command(["start", id])).await?;
        Ok(())
    }

    /// Create and start a detached container described by `config`.
    ///
    /// Returns the new container ID as printed by the runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn run_container(&self, config: &LifecycleConfig) -> Result<String> {
        let result = self.run(self.command(run_args(config))).await?;
        let id = result.stdout.trim().to_string();
        info!(
            "Created container {} ({})",
            config.container_name,
            id.get(..12).unwrap_or(&id)
        );
        Ok(id)
    }

    fn command<I, S>(&self, args: I) -> ExecutionCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExecutionCommand::new(
            self.runtime.binary(),
            args.into_iter().map(Into::into).collect(),
        )
    }

    async fn run(&self, command: ExecutionCommand) -> Result<ExecutionResult> {
        let line = command.display_line();
        info!("cmd: {}", line);

        let result = self.executor.execute(command).await?;
        if !result.success() {
            return Err(ContainerError::CommandFailed {
                command: line,
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        if !result.stdout.trim().is_empty() {
            debug!("{}", result.stdout.trim_end());
        }
        Ok(result)
    }
}

/// Arguments for `run`, after the binary name.
pub(crate) fn run_args(config: &LifecycleConfig) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        format!("--name={}", config.container_name),
        "-p".to_string(),
        format!("{}:{}", config.host_port, config.container_port),
        "-v".to_string(),
        format!(
            "{}:{}",
            config.data_dir.display(),
            config.container_data_path
        ),
    ];

    for (key, value) in &config.env {
        args.push("-e".to_string());
        args.push(format!("{}={}", key, value));
    }

    args.push(config.image_name.clone());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ScriptedExecutor;
    use std::path::PathBuf;

    fn client(executor: &ScriptedExecutor) -> ContainerClient {
        ContainerClient::new(Arc::new(executor.clone()), RuntimeType::Docker)
    }

    #[test]
    fn test_runtime_parsing() {
        assert_eq!("docker".parse::<RuntimeType>(), Ok(RuntimeType::Docker));
        assert_eq!("Podman".parse::<RuntimeType>(), Ok(RuntimeType::Podman));
        assert!("containerd".parse::<RuntimeType>().is_err());
        assert_eq!(RuntimeType::Podman.binary(), "podman");
    }

    #[test]
    fn test_run_args() {
        let config = LifecycleConfig {
            data_dir: PathBuf::from("/home/user/data/db-multi"),
            ..LifecycleConfig::default()
        };

        assert_eq!(
            run_args(&config),
            vec![
                "run",
                "-d",
                "--name=mysql-db-multi",
                "-p",
                "7200:3306",
                "-v",
                "/home/user/data/db-multi:/var/lib/mysql",
                "-e",
                "MYSQL_ALLOW_EMPTY_PASSWORD=yes",
                "mysql:5.6",
            ]
        );
    }

    #[test]
    fn test_run_args_env_flags_sorted_by_name() {
        let mut config = LifecycleConfig::new("mysql:8", "mysql-quicknotes")
            .with_data_dir("/srv/mysql")
            .with_env("MYSQL_ROOT_PASSWORD", "secret")
            .with_env("MYSQL_DATABASE", "quicknotes");
        config.env.remove("MYSQL_ALLOW_EMPTY_PASSWORD");

        let args = run_args(&config);
        let env_flags: Vec<&str> = args
            .windows(2)
            .filter(|pair| pair[0] == "-e")
            .map(|pair| pair[1].as_str())
            .collect();

        assert_eq!(
            env_flags,
            vec!["MYSQL_DATABASE=quicknotes", "MYSQL_ROOT_PASSWORD=secret"]
        );
    }

    #[tokio::test]
    async fn test_probe_succeeds() {
        let executor = ScriptedExecutor::new();
        executor.on(&["ps"], ExecutionResult::ok("CONTAINER ID   IMAGE\n"));

        client(&executor).verify_runtime_available().await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "docker");
        assert_eq!(calls[0].args, vec!["ps"]);
        assert_eq!(calls[0].timeout, Some(env::PROBE_TIMEOUT));
    }

    #[tokio::test]
    async fn test_probe_hung_daemon() {
        let executor = ScriptedExecutor::new();
        executor.time_out(&["ps"]);

        let err = client(&executor).verify_runtime_available().await.unwrap_err();
        assert!(matches!(err, ContainerError::RuntimeUnavailable(ref msg) if msg.contains("did not answer")));
    }

    #[tokio::test]
    async fn test_only_the_probe_is_bounded() {
        let executor = ScriptedExecutor::new();
        executor.on(&["start"], ExecutionResult::ok("abc\n"));

        client(&executor).start_container("abc").await.unwrap();
        assert_eq!(executor.calls()[0].timeout, None);
    }

    #[tokio::test]
    async fn test_probe_daemon_not_running() {
        let executor = ScriptedExecutor::new();
        executor.on(
            &["ps"],
            ExecutionResult::failed(1, "Cannot connect to the Docker daemon"),
        );

        let err = client(&executor).verify_runtime_available().await.unwrap_err();
        assert!(matches!(err, ContainerError::RuntimeUnavailable(ref msg) if msg.contains("Cannot connect")));
    }

    #[tokio::test]
    async fn test_probe_runtime_not_installed() {
        let executor = ScriptedExecutor::new();
        executor.fail_to_spawn(&["ps"]);

        let err = client(&executor).verify_runtime_available().await.unwrap_err();
        assert!(matches!(err, ContainerError::RuntimeUnavailable(_)));
    }

    #[tokio::test]
    async fn test_start_failure_is_command_failed() {
        let executor = ScriptedExecutor::new();
        executor.on(&["start"], ExecutionResult::failed(1, "No such container: abc"));

        let err = client(&executor).start_container("abc").await.unwrap_err();
        match err {
            ContainerError::CommandFailed {
                command,
                exit_code,
                stderr,
            } => {
                assert_eq!(command, "docker start abc");
                assert_eq!(exit_code, 1);
                assert_eq!(stderr, "No such container: abc");
            }
            other => panic!("expected command failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_container_returns_id() {
        let executor = ScriptedExecutor::new();
        executor.on(&["run"], ExecutionResult::ok("9b1d2f3a4c5e6f7a8b9c\n"));

        let id = client(&executor)
            .run_container(&LifecycleConfig::default())
            .await
            .unwrap();
        assert_eq!(id, "9b1d2f3a4c5e6f7a8b9c");
    }

    #[tokio::test]
    #[ignore] // Requires Docker to be running
    async fn test_probe_against_real_docker() {
        let client = ContainerClient::new(
            Arc::new(crate::executor::HostExecutor::new()),
            RuntimeType::detect(),
        );
        client.verify_runtime_available().await.unwrap();
    }
}
