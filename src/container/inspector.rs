//! Container listing and lookup.
//!
//! The runtime is asked for every container in a fixed `|`-delimited format.
//! [`parse_listing`] is the only place that knows about that text protocol.

use super::{ContainerClient, ContainerError, Result};
use serde::Serialize;
use tracing::debug;

/// Go template passed to `ps --format`; one container per line.
pub const LISTING_FORMAT: &str = "{{.ID}}|{{.Status}}|{{.Ports}}|{{.Names}}";

/// One row of the runtime's container listing.
///
/// Records are never updated; callers re-inspect to observe a new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRecord {
    /// Runtime-assigned container ID
    pub id: String,
    /// Free-text status, e.g. `Up 2 hours`
    pub status_raw: String,
    /// Free-text published ports, e.g. `0.0.0.0:7200->3306/tcp`
    pub ports_raw: String,
    /// Comma-joined container names
    pub names: String,
}

/// Parse `ps -a` output produced with [`LISTING_FORMAT`].
///
/// # Errors
///
/// Returns [`ContainerError::FormatViolation`] for any non-blank line that does
/// not have exactly four fields.
pub fn parse_listing(output: &str) -> Result<Vec<ContainerRecord>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split('|').collect();
            match fields.as_slice() {
                [id, status, ports, names] => Ok(ContainerRecord {
                    id: id.to_string(),
                    status_raw: status.to_string(),
                    ports_raw: ports.to_string(),
                    names: names.to_string(),
                }),
                _ => Err(ContainerError::FormatViolation {
                    line: line.to_string(),
                    fields: fields.len(),
                }),
            }
        })
        .collect()
}

/// First record whose names field contains `name`.
///
/// Matches substrings: the runtime may report several
/// comma-joined aliases for one container.
pub fn find_by_name<'a>(records: &'a [ContainerRecord], name: &str) -> Option<&'a ContainerRecord> {
    records.iter().find(|record| record.names.contains(name))
}

/// Queries the runtime for containers.
#[derive(Clone)]
pub struct ContainerInspector {
    client: ContainerClient,
}

impl ContainerInspector {
    /// Create an inspector over the given client.
    pub fn new(client: ContainerClient) -> Self {
        Self { client }
    }

    /// List every container known to the runtime, running or not.
    ///
    /// # Errors
    ///
    /// Returns error if the listing command fails or its output is malformed.
    pub async fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
        let output = self.client.list_all(LISTING_FORMAT).await?;
        let records = parse_listing(&output)?;
        debug!("Runtime reported {} containers", records.len());
        Ok(records)
    }

    /// Look up a container by name; `Ok(None)` means it does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if listing fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ContainerRecord>> {
        let records = self.list_containers().await?;
        Ok(find_by_name(&records, name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
6c5a934e00fb|Exited (0) 3 months ago|0.0.0.0:7200->3306/tcp|mysql-56-for-quicknotes
9b1d2f3a4c5e|Up 2 hours|0.0.0.0:7200->3306/tcp, :::7200->3306/tcp|mysql-db-multi

1a2b3c4d5e6f|Created||mysql-db-multi-old,alias
";

    #[test]
    fn test_parse_listing() {
        let records = parse_listing(SAMPLE).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "6c5a934e00fb");
        assert_eq!(records[0].status_raw, "Exited (0) 3 months ago");
        assert_eq!(records[0].ports_raw, "0.0.0.0:7200->3306/tcp");
        assert_eq!(records[0].names, "mysql-56-for-quicknotes");
        assert_eq!(records[2].ports_raw, "");
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_listing("").unwrap().is_empty());
        assert!(parse_listing("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_rejects_wrong_field_count() {
        let result = parse_listing("abc|Up 2 hours|mysql-db-multi\n");

        match result {
            Err(ContainerError::FormatViolation { line, fields }) => {
                assert_eq!(line, "abc|Up 2 hours|mysql-db-multi");
                assert_eq!(fields, 3);
            }
            other => panic!("expected format violation, got {:?}", other),
        }

        assert!(matches!(
            parse_listing("a|b|c|d|e"),
            Err(ContainerError::FormatViolation { fields: 5, .. })
        ));
    }

    #[test]
    fn test_find_by_name_returns_first_match() {
        let records = parse_listing(SAMPLE).unwrap();

        let found = find_by_name(&records, "mysql-db-multi").unwrap();
        assert_eq!(found.id, "9b1d2f3a4c5e");
    }

    #[test]
    fn test_find_by_name_matches_alias() {
        let records = parse_listing(SAMPLE).unwrap();

        let found = find_by_name(&records, "alias").unwrap();
        assert_eq!(found.id, "1a2b3c4d5e6f");
    }

    #[test]
    fn test_find_by_name_ignores_other_fields() {
        let records = parse_listing(SAMPLE).unwrap();

        assert!(find_by_name(&records, "6c5a934e00fb").is_none());
        assert!(find_by_name(&records, "Exited").is_none());
        assert!(find_by_name(&records, "7200").is_none());
        assert!(find_by_name(&records, "postgres").is_none());
    }
}
