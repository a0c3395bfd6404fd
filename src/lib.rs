//! # db-container
//!
//! Keeps a single, uniquely named database container running on the local
//! machine and reports the host address its port is published on. Test suites
//! call it before connecting; it creates the container on first use, resumes
//! it after a reboot, and does nothing when it is already up.
//!
//! ## Architecture Overview
//!
//! - **[`container`]**: listing parser, state classification, port decoding and
//!   the resume/create/wait lifecycle
//! - **[`executor`]**: process spawning behind a trait, with a host
//!   implementation and a scriptable stub for tests
//! - **[`cli`]**: command-line arguments and configuration discovery
//! - **[`env`]**: defaults, exit codes and file names
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use db_container::{ContainerLifecycleManager, HostExecutor, LifecycleConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LifecycleConfig::default().with_host_port(7201);
//!     let manager = ContainerLifecycleManager::new(Arc::new(HostExecutor::new()), config)?;
//!
//!     let address = manager.ensure_running().await?;
//!     println!("mysql://root@{}:{}/", address.host_address, address.host_port);
//!     Ok(())
//! }
//! ```

/// Container lifecycle management over the runtime CLI.
///
/// Inspects containers by name, classifies their state, and resumes or
/// creates the managed container before resolving its published address.
pub mod container;

/// Command execution abstraction.
///
/// Runs runtime commands on the host or answers them from a script.
pub mod executor;

/// Environment constants and path utilities.
pub mod env;

/// Command-line arguments, configuration discovery and exit codes.
pub mod cli;

pub use container::{
    ContainerError, ContainerLifecycleManager, ContainerRecord, LifecycleConfig, LifecycleState,
    PortMapping, RuntimeType,
};
pub use executor::{CommandExecutor, HostExecutor, ScriptedExecutor};
