//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `up`: Ensure the container is running and print its address (default)
//! - `status`: Report the container's state without changing it
//! - `show-config`: Show the effective configuration and where it came from
//!
//! Every configuration option can also be given through a `DB_CONTAINER_*`
//! environment variable.

use crate::container::{LifecycleConfig, RuntimeType};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    Up,                     // Ensure running, print `<host>;<port>`
    Status { json: bool },  // Read-only inspection
    ShowConfig,             // Show configuration discovery info
}

#[derive(Debug, Parser)]
#[command(name = "db-container")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Keeps a named database container running and prints the address it is published on"
)]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (skips discovery)
    #[arg(short = 'c', long = "config", global = true, env = "DB_CONTAINER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ensure the container is running and print `<host>;<port>`
    Up,
    /// Report the container's state without changing it
    Status {
        /// Print the report as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Show the effective configuration and the discovery hierarchy
    ShowConfig,
}

/// Options that override values from the configuration file.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct ConfigOverrides {
    /// Container runtime: docker or podman
    #[arg(long = "runtime", global = true, env = "DB_CONTAINER_RUNTIME")]
    pub runtime: Option<RuntimeType>,
    /// Image used when the container is created
    #[arg(long = "image", global = true, env = "DB_CONTAINER_IMAGE")]
    pub image: Option<String>,
    /// Container name
    #[arg(long = "name", global = true, env = "DB_CONTAINER_NAME")]
    pub container_name: Option<String>,
    /// Host directory bound as the data volume
    #[arg(long = "data-dir", global = true, env = "DB_CONTAINER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Published host port
    #[arg(long = "host-port", global = true, env = "DB_CONTAINER_HOST_PORT")]
    pub host_port: Option<u16>,
    /// Database port inside the container
    #[arg(long = "container-port", global = true, env = "DB_CONTAINER_CONTAINER_PORT")]
    pub container_port: Option<u16>,
    /// Seconds to wait for the container to report running
    #[arg(long = "timeout", value_name = "SECS", global = true, env = "DB_CONTAINER_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ConfigOverrides {
    /// Apply the given overrides on top of `config`.
    pub fn apply(&self, mut config: LifecycleConfig) -> LifecycleConfig {
        if let Some(runtime) = self.runtime {
            config.runtime = Some(runtime);
        }
        if let Some(ref image) = self.image {
            config.image_name = image.clone();
        }
        if let Some(ref name) = self.container_name {
            config.container_name = name.clone();
        }
        if let Some(ref data_dir) = self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(port) = self.host_port {
            config.host_port = port;
        }
        if let Some(port) = self.container_port {
            config.container_port = port;
        }
        if let Some(timeout) = self.timeout {
            config.startup_timeout_secs = timeout;
        }
        config
    }
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Execution mode; no subcommand means `up`.
    pub fn mode(&self) -> ExecutionMode {
        match &self.command {
            Some(Commands::Up) | None => ExecutionMode::Up,
            Some(Commands::Status { json }) => ExecutionMode::Status { json: *json },
            Some(Commands::ShowConfig) => ExecutionMode::ShowConfig,
        }
    }
}
