//! Port mapping decoding.
//!
//! The runtime reports published ports as `<hostIP>:<hostPort>-><containerPort>/<proto>`,
//! comma-separated when there are several.

use serde::Serialize;
use std::fmt;

/// Host-side address that reaches the container's published port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    /// Host interface the port is bound on, e.g. `0.0.0.0`
    pub host_address: String,
    /// Host port, kept as reported by the runtime
    pub host_port: String,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_address, self.host_port)
    }
}

/// Split one mapping into its host mapping and container side (`3306/tcp`).
fn split_mapping(entry: &str) -> Option<(PortMapping, &str)> {
    let parts: Vec<&str> = entry.split("->").collect();
    let [host, container] = parts.as_slice() else {
        return None;
    };

    let host_parts: Vec<&str> = host.split(':').collect();
    let [host_address, host_port] = host_parts.as_slice() else {
        return None;
    };

    Some((
        PortMapping {
            host_address: host_address.to_string(),
            host_port: host_port.to_string(),
        },
        *container,
    ))
}

/// Decode a single mapping such as `0.0.0.0:7200->3306/tcp`.
///
/// Any other shape, including an unpublished `3306/tcp` or an empty string,
/// yields `None`.
pub fn decode(ports_raw: &str) -> Option<PortMapping> {
    split_mapping(ports_raw).map(|(mapping, _)| mapping)
}

/// Find the mapping published for `container_port` in a possibly multi-entry
/// ports string such as `0.0.0.0:7200->3306/tcp, :::7200->3306/tcp`.
///
/// Entries are decoded with the same rules as [`decode`], so IPv6 entries
/// (which contain extra colons) are skipped.
pub fn decode_published(ports_raw: &str, container_port: u16) -> Option<PortMapping> {
    let wanted = container_port.to_string();

    ports_raw
        .split(',')
        .map(str::trim)
        .filter_map(split_mapping)
        .find(|(_, container)| container.split('/').next() == Some(wanted.as_str()))
        .map(|(mapping, _)| mapping)
}
