//! Environment constants and path utilities for db-container.
//!
//! This module centralizes the defaults and file names used throughout the
//! crate, making them easier to maintain and modify.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default image; `mysql:8` works too but needs a different bootstrap env
pub const DEFAULT_IMAGE: &str = "mysql:5.6";

/// Default container name, unique across containers on this machine
pub const DEFAULT_CONTAINER_NAME: &str = "mysql-db-multi";

/// Default host data directory; survives container removal
pub const DEFAULT_DATA_DIR: &str = "~/data/db-multi";

/// Default published host port, kept off 3306 so several databases can coexist
pub const DEFAULT_HOST_PORT: u16 = 7200;

/// Default MySQL port inside the container
pub const DEFAULT_CONTAINER_PORT: u16 = 3306;

/// Default MySQL data path inside the container
pub const DEFAULT_CONTAINER_DATA_PATH: &str = "/var/lib/mysql";

/// Environment passed on creation for a passwordless root account
pub const DEFAULT_CONTAINER_ENV: &[(&str, &str)] = &[("MYSQL_ALLOW_EMPTY_PASSWORD", "yes")];

/// Default grace period for the container to report running
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 8;

/// Delay between two state polls while waiting for the container
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound for the runtime probe; a daemon that hangs longer counts as down
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Process exit code when the container runtime is not available
pub const EXIT_RUNTIME_UNAVAILABLE: i32 = 10;

/// Process exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// Configuration directory name (hidden directory like .git, .vscode)
pub const CONFIG_DIR_NAME: &str = ".db-container";

/// Configuration file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "db-container.toml";

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build config file path inside the hidden directory of `current_dir`
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}
