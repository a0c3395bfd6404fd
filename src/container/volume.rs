//! Host data directory provisioning.
//!
//! The database files live in a host directory bound into the container so
//! they survive container recreation. It has to exist before the first `run`.

use crate::container::{ContainerError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Create `path` and any missing parents.
///
/// An existing directory is success. Anything else that prevents the
/// directory from existing afterwards (a file in the way, missing permissions)
/// is reported.
///
/// # Errors
///
/// Returns [`ContainerError::DataDirectory`] if the directory cannot be created.
pub fn ensure_data_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        debug!("Data directory {} already exists", path.display());
        return Ok(());
    }

    match std::fs::create_dir_all(path) {
        Ok(()) => {
            info!("Created data directory {}", path.display());
            Ok(())
        }
        // Created concurrently by another process.
        Err(_) if path.is_dir() => Ok(()),
        Err(source) => Err(ContainerError::DataDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Expand a leading `~` against `home`.
///
/// Paths without a leading `~` component, or when no home directory is
/// known, are returned unchanged.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Current user's home directory from `HOME` (or `USERPROFILE` on Windows).
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data").join("db-multi");

        ensure_data_dir(&data_dir).unwrap();
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_second_call_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("db");

        ensure_data_dir(&data_dir).unwrap();
        ensure_data_dir(&data_dir).unwrap();
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_file_at_parent_segment_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = ensure_data_dir(&blocker.join("db-multi")).unwrap_err();
        match err {
            ContainerError::DataDirectory { path, .. } => {
                assert_eq!(path, blocker.join("db-multi"));
            }
            other => panic!("expected data directory error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_at_target_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("db");
        std::fs::write(&blocker, "").unwrap();

        assert!(matches!(
            ensure_data_dir(&blocker),
            Err(ContainerError::DataDirectory { .. })
        ));
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/user");

        assert_eq!(
            expand_home(Path::new("~/data/db-multi"), Some(home)),
            PathBuf::from("/home/user/data/db-multi")
        );
        assert_eq!(expand_home(Path::new("~"), Some(home)), PathBuf::from("/home/user"));
        assert_eq!(
            expand_home(Path::new("/srv/db"), Some(home)),
            PathBuf::from("/srv/db")
        );
        assert_eq!(
            expand_home(Path::new("~other/db"), Some(home)),
            PathBuf::from("~other/db")
        );
        assert_eq!(
            expand_home(Path::new("~/db"), None),
            PathBuf::from("~/db")
        );
    }
}
