//! Lifecycle configuration.
//!
//! One immutable [`LifecycleConfig`] describes the managed container. It is
//! passed explicitly to the manager so several isolated managers can coexist.

use crate::container::{ContainerError, Result, RuntimeType};
use crate::env;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for the managed database container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Runtime to drive; detected from `PATH` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeType>,
    /// Image used when the container has to be created
    pub image_name: String,
    /// Name that identifies the container among all containers on the host
    pub container_name: String,
    /// Host directory bound as the database data volume; `~/` is expanded
    pub data_dir: PathBuf,
    /// Host port published for the database
    pub host_port: u16,
    /// Port the database listens on inside the container
    pub container_port: u16,
    /// Data path inside the container
    pub container_data_path: String,
    /// Grace period for the container to report running, in seconds
    pub startup_timeout_secs: u64,
    /// Environment passed on creation, as `-e` flags sorted by name
    pub env: BTreeMap<String, String>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            image_name: env::DEFAULT_IMAGE.to_string(),
            container_name: env::DEFAULT_CONTAINER_NAME.to_string(),
            data_dir: PathBuf::from(env::DEFAULT_DATA_DIR),
            host_port: env::DEFAULT_HOST_PORT,
            container_port: env::DEFAULT_CONTAINER_PORT,
            container_data_path: env::DEFAULT_CONTAINER_DATA_PATH.to_string(),
            startup_timeout_secs: env::DEFAULT_STARTUP_TIMEOUT_SECS,
            env: env::DEFAULT_CONTAINER_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl LifecycleConfig {
    /// Create a configuration for `container_name` running `image_name`.
    pub fn new(image_name: impl Into<String>, container_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            container_name: container_name.into(),
            ..Default::default()
        }
    }

    /// Set the runtime
    pub fn with_runtime(mut self, runtime: RuntimeType) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Set the host data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Set the published host port
    pub fn with_host_port(mut self, port: u16) -> Self {
        self.host_port = port;
        self
    }

    /// Set the container-side port
    pub fn with_container_port(mut self, port: u16) -> Self {
        self.container_port = port;
        self
    }

    /// Set the startup grace period in seconds
    pub fn with_startup_timeout_secs(mut self, secs: u64) -> Self {
        self.startup_timeout_secs = secs;
        self
    }

    /// Add an environment variable passed on creation
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Check the values the runtime commands depend on.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.image_name.trim().is_empty() {
            return Err(ContainerError::ConfigError("image_name is required".to_string()));
        }
        if self.container_name.trim().is_empty() {
            return Err(ContainerError::ConfigError(
                "container_name is required".to_string(),
            ));
        }
        // The listing is '|'-delimited; such a name could never be matched reliably.
        if self.container_name.contains('|') {
            return Err(ContainerError::ConfigError(format!(
                "container_name '{}' must not contain '|'",
                self.container_name
            )));
        }
        if self.host_port == 0 || self.container_port == 0 {
            return Err(ContainerError::ConfigError(
                "host_port and container_port must be non-zero".to_string(),
            ));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ContainerError::ConfigError("data_dir is required".to_string()));
        }
        if self.container_data_path.trim().is_empty() {
            return Err(ContainerError::ConfigError(
                "container_data_path is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a configuration from TOML; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ContainerError::ConfigError(e.to_string()))
    }

    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ContainerError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ContainerError::ConfigError(e.to_string()))
    }
}
