//! Remote hosts.
//!
//! Hosts come either from an inline, space-separated list or from a host file
//! with one host per line. Every host gets exactly one SSH invocation.

use std::fmt;
use std::path::Path;

use tracing::info;

use crate::config::HostSource;
use crate::error::RuncmdError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Name or address handed to the SSH client as is.
    pub hostname: String,
}

impl Host {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.hostname)
    }
}

/// Splits an inline server list on spaces. Repeated spaces never produce
/// empty hosts.
pub fn parse_inline(list: &str) -> Vec<Host> {
    list.split(' ')
        .filter(|token| !token.is_empty())
        .map(Host::new)
        .collect()
}

/// Parses host file contents.
///
/// Each line holds one host. Everything from `#` to the end of the line is a
/// comment, and lines left blank after stripping comments are skipped.
pub fn parse_host_file(contents: &str) -> Vec<Host> {
    contents
        .lines()
        .map(|line| match line.find('#') {
            Some(start) => &line[..start],
            None => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Host::new)
        .collect()
}

pub fn read_host_file(path: &Path) -> Result<Vec<Host>, RuncmdError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RuncmdError::HostFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_host_file(&contents))
}

/// Resolves the configured host source into the ordered host list.
pub fn get_hosts(source: &HostSource) -> Result<Vec<Host>, RuncmdError> {
    let hosts = match source {
        HostSource::Inline(list) => parse_inline(list),
        HostSource::File(path) => read_host_file(path)?,
        HostSource::Empty => vec![],
    };
    info!(count = hosts.len(), "Hosts resolved");
    Ok(hosts)
}
