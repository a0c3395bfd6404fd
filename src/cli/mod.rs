//! CLI-specific functionality for db-container
//!
//! This module contains all CLI-related code including argument parsing,
//! configuration discovery and exit codes.

pub mod args;
pub mod config;
pub mod exit;

pub use args::{Args, Commands, ConfigOverrides, ExecutionMode};
pub use config::{ConfigDiscovery, ConfigSource};
pub use exit::exit_code;
