use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuncmdError {
    #[error("Failed to read host file {}: {source}", .path.display())]
    HostFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to execute SSH client: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("{status}")]
    Exit { status: ExitStatus, stderr: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("Failed to write results: {0}")]
    Output(#[source] std::io::Error),
}

/// Invalid flag combinations. These are reported to the user and the process
/// still exits with status 0.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please provide only one parameter at time: -s or -f.")]
    ExclusiveSources,
    #[error("Please provide two parameters simultaneously: -r and -t.")]
    UnpairedBatch,
}
