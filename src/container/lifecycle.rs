//! Resume-or-create lifecycle for the managed container.
//!
//! [`ContainerLifecycleManager`] makes one decision from a fresh listing:
//!
//! ```text
//! Absent  -> create (provision data dir, `run -d ...`) -> wait
//! Exited  -> resume (`start <id>`)                      -> wait
//! Running -> nothing
//! ```
//!
//! and then resolves the published address from another fresh listing.

use super::{
    ContainerClient, ContainerError, ContainerInspector, ContainerRecord, LifecycleConfig,
    LifecycleState, PortMapping, Result, classify_record, decode_published, ensure_data_dir,
    expand_home, home_dir,
};
use crate::container::RuntimeType;
use crate::env;
use crate::executor::CommandExecutor;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the manager decided to do with the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Container was already running; no command issued
    AlreadyRunning,
    /// Exited container with this ID was started again
    Resume { id: String },
    /// No container existed; a new one was created
    Create,
}

/// Result of waiting for the container to report running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Observed running before the grace period ran out
    Ready,
    /// Grace period ran out; the container may still come up
    TimedOut,
}

/// Read-only snapshot of the managed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStatusReport {
    pub container_name: String,
    pub state: LifecycleState,
    pub record: Option<ContainerRecord>,
    pub address: Option<PortMapping>,
}

/// Keeps one named container running and reports where it listens.
///
/// Not safe to run concurrently with another manager for the same container
/// name: nothing locks the container between the listing and the start/run.
pub struct ContainerLifecycleManager {
    client: ContainerClient,
    inspector: ContainerInspector,
    config: LifecycleConfig,
}

impl ContainerLifecycleManager {
    /// Create a manager that runs runtime commands through `executor`.
    ///
    /// Validates the configuration, expands a leading `~` in the data
    /// directory, makes it absolute, and detects the runtime when none is
    /// configured.
    ///
    /// A relative `-v` source would be taken by the runtime as a named volume
    /// instead of the host directory, so relative paths are resolved against
    /// the current directory here.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::ConfigError`] for an invalid configuration or
    /// a data directory that cannot be made absolute.
    pub fn new(executor: Arc<dyn CommandExecutor>, mut config: LifecycleConfig) -> Result<Self> {
        config.validate()?;
        let expanded = expand_home(&config.data_dir, home_dir().as_deref());
        config.data_dir = std::path::absolute(&expanded).map_err(|e| {
            ContainerError::ConfigError(format!(
                "cannot resolve data_dir {}: {}",
                expanded.display(),
                e
            ))
        })?;

        let runtime = *config.runtime.get_or_insert_with(RuntimeType::detect);
        debug!(
            "Lifecycle manager for '{}' using {} via {} executor",
            config.container_name,
            runtime,
            executor.executor_type()
        );
        let client = ContainerClient::new(executor, runtime);

        Ok(Self {
            inspector: ContainerInspector::new(client.clone()),
            client,
            config,
        })
    }

    /// Effective configuration, with paths expanded and runtime resolved.
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Underlying runtime client.
    pub fn client(&self) -> &ContainerClient {
        &self.client
    }

    /// Decide what to do given the current lookup result.
    pub fn decide(record: Option<&ContainerRecord>) -> LifecycleAction {
        match (classify_record(record), record) {
            (LifecycleState::Exited, Some(record)) => LifecycleAction::Resume {
                id: record.id.clone(),
            },
            (LifecycleState::Running, _) => LifecycleAction::AlreadyRunning,
            _ => LifecycleAction::Create,
        }
    }

    /// Current state of the container together with its listing row.
    ///
    /// # Errors
    ///
    /// Returns error if listing fails.
    pub async fn current_state(&self) -> Result<(LifecycleState, Option<ContainerRecord>)> {
        let record = self
            .inspector
            .find_by_name(&self.config.container_name)
            .await?;
        Ok((classify_record(record.as_ref()), record))
    }

    /// Resume or create the container unless it is already running, then wait
    /// for it to report running.
    ///
    /// # Errors
    ///
    /// Returns error if listing, provisioning, `start` or `run` fails. Running
    /// out of wait time is not an error.
    pub async fn start_if_needed(&self) -> Result<LifecycleAction> {
        let name = &self.config.container_name;
        let (_, record) = self.current_state().await?;
        let action = Self::decide(record.as_ref());

        match &action {
            LifecycleAction::AlreadyRunning => {
                info!("container {} is already running", name);
                return Ok(action);
            }
            LifecycleAction::Resume { id } => {
                info!("Resuming exited container {} ({})", name, id);
                self.client.start_container(id).await?;
            }
            LifecycleAction::Create => {
                info!("No container named {}, creating it from {}", name, self.config.image_name);
                ensure_data_dir(&self.config.data_dir)?;
                self.client.run_container(&self.config).await?;
            }
        }

        self.wait_for_ready().await?;
        Ok(action)
    }

    /// Poll once per second until the container reports running or the
    /// configured grace period runs out.
    ///
    /// Timing out is reported as [`WaitOutcome::TimedOut`], not as an error:
    /// a slow container is given the benefit of the doubt and the final
    /// address resolution decides. This can hide a container that never comes
    /// up until that later check.
    ///
    /// # Errors
    ///
    /// Returns error if a listing fails.
    pub async fn wait_for_ready(&self) -> Result<WaitOutcome> {
        let name = &self.config.container_name;
        let mut remaining = self.config.startup_timeout_secs;

        info!("waiting {} secs for container {} to start", remaining, name);
        while remaining > 0 {
            let (state, _) = self.current_state().await?;
            if state == LifecycleState::Running {
                info!("container {} is running", name);
                return Ok(WaitOutcome::Ready);
            }

            debug!("container {} is {}, {}s left", name, state, remaining);
            tokio::time::sleep(env::POLL_INTERVAL).await;
            remaining -= 1;
        }

        warn!(
            "container {} did not report running within {}s; continuing without it",
            name, self.config.startup_timeout_secs
        );
        Ok(WaitOutcome::TimedOut)
    }

    /// Re-inspect the container and decode its published address.
    ///
    /// `Ok(None)` means nothing usable is published, e.g. the container is
    /// absent, exited, or still starting. Callers that need an address must
    /// treat that as fatal; [`ensure_running`](Self::ensure_running) does.
    ///
    /// # Errors
    ///
    /// Returns error if listing fails.
    pub async fn resolve_address(&self) -> Result<Option<PortMapping>> {
        let (_, record) = self.current_state().await?;
        Ok(record.and_then(|r| decode_published(&r.ports_raw, self.config.container_port)))
    }

    /// Probe the runtime, provision the data directory, resume or create the
    /// container, and return its published address.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::RuntimeUnavailable`] if the runtime does not
    /// answer, [`ContainerError::MappingUnavailable`] if no address could be
    /// resolved at the end, or any error from the intermediate steps.
    pub async fn ensure_running(&self) -> Result<PortMapping> {
        self.client.verify_runtime_available().await?;
        ensure_data_dir(&self.config.data_dir)?;

        let action = self.start_if_needed().await?;
        debug!("Lifecycle action for {}: {:?}", self.config.container_name, action);

        let address = self
            .resolve_address()
            .await?
            .ok_or_else(|| ContainerError::MappingUnavailable(self.config.container_name.clone()))?;

        info!("container {} listens on {}", self.config.container_name, address);
        Ok(address)
    }

    /// Snapshot of the container without changing it.
    ///
    /// # Errors
    ///
    /// Returns error if listing fails.
    pub async fn status(&self) -> Result<ContainerStatusReport> {
        let (state, record) = self.current_state().await?;
        let address = record
            .as_ref()
            .and_then(|r| decode_published(&r.ports_raw, self.config.container_port));

        Ok(ContainerStatusReport {
            container_name: self.config.container_name.clone(),
            state,
            record,
            address,
        })
    }
}
