//! Picking a host from the registry by id or display name

use std::fmt::Write;

use mc_sdk::{HostConfig, HostRegistry};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("Host '{query}' not found. Known hosts:\n{available}")]
    HostNotFound { query: String, available: String },

    #[error("No hosts configured. Add one with `mc-cli add`")]
    NoHosts,

    #[error("No host selected. Pass --host or run `mc-cli use <host>`")]
    NoneSelected,
}

/// Exact id match first, then case-insensitive name match
pub fn find_host<'a>(registry: &'a HostRegistry, query: &str) -> Result<&'a HostConfig, SelectionError> {
    if registry.hosts().is_empty() {
        return Err(SelectionError::NoHosts);
    }

    registry
        .get(query)
        .or_else(|| {
            registry
                .hosts()
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(query))
        })
        .ok_or_else(|| SelectionError::HostNotFound {
            query: query.to_string(),
            available: list_hosts(registry),
        })
}

/// Host named on the command line, or else the registry's active host
pub fn resolve_host<'a>(
    registry: &'a HostRegistry,
    query: Option<&str>,
) -> Result<&'a HostConfig, SelectionError> {
    match query {
        Some(query) => find_host(registry, query),
        None if registry.hosts().is_empty() => Err(SelectionError::NoHosts),
        None => registry.active().ok_or(SelectionError::NoneSelected),
    }
}

/// One line per host, the active one marked with `*`
pub fn list_hosts(registry: &HostRegistry) -> String {
    let active = registry.active().map(|h| h.id.as_str());
    let mut out = String::new();
    for host in registry.hosts() {
        let marker = if Some(host.id.as_str()) == active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{} {:<16} {:<24} {}:{} ({:?})",
            marker, host.id, host.name, host.address, host.http_port, host.transport
        );
    }
    out
}
