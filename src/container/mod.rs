//! Container lifecycle management over the runtime's command-line interface.
//!
//! This module keeps one named database container alive on the local machine.
//! It talks to Docker or Podman exclusively through their CLI, parses the
//! tabular `ps` listing, and resumes or creates the container as needed.
//!
//! ## Architecture
//!
//! - `client`: runtime CLI wrapper; probe, list, start and run commands
//! - `config`: immutable [`LifecycleConfig`] with serde/TOML support
//! - `inspector`: listing parser and lookup by name
//! - `state`: raw status text to [`LifecycleState`]
//! - `ports`: raw port text to [`PortMapping`]
//! - `volume`: host data directory provisioning
//! - `lifecycle`: the resume/create/wait state machine
//!
//! ## Usage
//!
//! ```rust,no_run
//! use db_container::container::{ContainerLifecycleManager, LifecycleConfig};
//! use db_container::executor::HostExecutor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let manager = ContainerLifecycleManager::new(
//!         Arc::new(HostExecutor::new()),
//!         LifecycleConfig::default(),
//!     )?;
//!
//!     let address = manager.ensure_running().await?;
//!     println!("{};{}", address.host_address, address.host_port);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod inspector;
mod lifecycle;
mod ports;
mod state;
mod volume;

pub use client::{ContainerClient, RuntimeType};
pub use config::LifecycleConfig;
pub use inspector::{ContainerInspector, ContainerRecord, LISTING_FORMAT, find_by_name, parse_listing};
pub use lifecycle::{ContainerLifecycleManager, ContainerStatusReport, LifecycleAction, WaitOutcome};
pub use ports::{PortMapping, decode, decode_published};
pub use state::{LifecycleState, classify, classify_record};
pub use volume::{ensure_data_dir, expand_home, home_dir};

use crate::executor::ExecutorError;
use std::path::PathBuf;

/// Container runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The runtime is not installed or its daemon is not running
    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// A listing line did not have the expected number of fields
    #[error("Unexpected runtime output: expected 4 '|'-separated fields, got {fields} in line {line:?}")]
    FormatViolation { line: String, fields: usize },

    /// A runtime command exited with a non-zero status
    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// No published port mapping could be resolved for the container
    #[error("No published address for container '{0}'")]
    MappingUnavailable(String),

    /// The host data directory could not be created
    #[error("Failed to provision data directory {}: {source}", path.display())]
    DataDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Container configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Command could not be executed at all
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
