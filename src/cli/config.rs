//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Explicit `--config` path
//! 2. Current directory: ./db-container.toml or ./.db-container/config.toml
//! 3. User config: ~/.db-container/config.toml
//! 4. Built-in defaults

use crate::container::{ContainerError, LifecycleConfig, home_dir};
use crate::env;
use std::env as std_env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load the explicit file if given, otherwise the first discovered one,
    /// otherwise the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the selected file cannot be read or parsed. An
    /// explicit path that does not exist is an error too.
    pub fn load(explicit: Option<&Path>) -> Result<(LifecycleConfig, ConfigSource), ContainerError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };

        match path {
            Some(path) => {
                info!("Loading configuration from: {:?}", path);
                let config = LifecycleConfig::from_toml_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            None => {
                info!("No configuration file found, using defaults");
                Ok((LifecycleConfig::default(), ConfigSource::Defaults))
            }
        }
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let current_dir = std_env::current_dir().ok();
        let home = home_dir();
        Self::first_existing(&Self::config_candidates(
            current_dir.as_deref(),
            home.as_deref(),
        ))
    }

    /// Configuration file candidates in priority order
    pub fn config_candidates(current_dir: Option<&Path>, home_dir: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(current_dir) = current_dir {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(current_dir));
        }

        if let Some(home_dir) = home_dir {
            candidates.push(env::user_config_file_path(home_dir));
        }

        candidates
    }

    /// First candidate that exists and is a regular file
    pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate.clone());
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let current_dir = std_env::current_dir().ok();
        let home = home_dir();
        let candidates = Self::config_candidates(current_dir.as_deref(), home.as_deref());
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "EXISTS"
                } else {
                    "NOT A FILE"
                }
            } else {
                "NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        match Self::first_existing(&candidates) {
            Some(found) => println!("Active configuration: {:?}", found),
            None => println!("Active configuration: Built-in defaults"),
        }
    }
}
