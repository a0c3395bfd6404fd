//! Lifecycle state classification.

use super::ContainerRecord;
use serde::Serialize;
use std::fmt;

/// Observed lifecycle state of the managed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No container with the configured name exists
    Absent,
    /// Container exists but has stopped
    Exited,
    /// Container exists and is not exited
    Running,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Absent => write!(f, "absent"),
            LifecycleState::Exited => write!(f, "exited"),
            LifecycleState::Running => write!(f, "running"),
        }
    }
}

/// Classify a raw runtime status such as `Up 2 hours` or `Exited (0) 3 months ago`.
///
/// Only the case-sensitive `Exited` token is significant. Everything else,
/// including `Created` and `Up 1 second (Paused)`, counts as running: the caller
/// only needs to know whether a `start` is required.
pub fn classify(status_raw: &str) -> LifecycleState {
    if status_raw.contains("Exited") {
        LifecycleState::Exited
    } else {
        LifecycleState::Running
    }
}

/// Classify an optional lookup result; no record means [`LifecycleState::Absent`].
pub fn classify_record(record: Option<&ContainerRecord>) -> LifecycleState {
    record.map_or(LifecycleState::Absent, |r| classify(&r.status_raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exited_statuses() {
        for status in [
            "Exited (0) 3 months ago",
            "Exited (137) 5 seconds ago",
            "prefix Exited",
        ] {
            assert_eq!(classify(status), LifecycleState::Exited, "{status}");
        }
    }

    #[test]
    fn test_everything_else_is_running() {
        for status in [
            "Up 2 hours",
            "Up 3 seconds (Paused)",
            "Created",
            "Restarting (1) 2 seconds ago",
            "exited (0) lowercase is not the runtime's spelling",
            "",
        ] {
            assert_eq!(classify(status), LifecycleState::Running, "{status}");
        }
    }

    #[test]
    fn test_classify_record() {
        assert_eq!(classify_record(None), LifecycleState::Absent);

        let record = ContainerRecord {
            id: "abc".to_string(),
            status_raw: "Exited (0) 1 hour ago".to_string(),
            ports_raw: String::new(),
            names: "mysql-db-multi".to_string(),
        };
        assert_eq!(classify_record(Some(&record)), LifecycleState::Exited);
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::Absent.to_string(), "absent");
        assert_eq!(LifecycleState::Exited.to_string(), "exited");
        assert_eq!(LifecycleState::Running.to_string(), "running");
    }
}
