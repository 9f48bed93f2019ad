//! Configuration for runcmd.
//!
//! Holds the clap struct for command line flags and the validation that turns
//! them into a [`Plan`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};

use crate::dispatch::BatchConfig;
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "runcmd",
    version,
    about = "Run a command concurrently on remote servers over SSH.",
    long_about = "Run a command concurrently on remote servers over SSH.\n\n\
        SSH is used as the transport, so key-based access from this machine \
        to every server must already be set up."
)]
pub struct Config {
    /// Command to execute in quotes if needed
    #[arg(short = 'c', long = "command", default_value = "uptime")]
    pub command: String,

    /// List of servers in quotes
    #[arg(short = 's', long = "servers", value_name = "LIST")]
    pub servers: Option<String>,

    /// File with servers list (one per line); comments using # are allowed
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Number of results to print before each pause; must be used with -t
    #[arg(short = 'r', long = "rate", default_value_t = 0)]
    pub rate: usize,

    /// Seconds to sleep between groups of servers; must be used with -r
    #[arg(short = 't', long = "sleep", default_value_t = 0)]
    pub sleep: u64,

    /// Give up on a server after this many seconds (no limit by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// SSH client to invoke as `<ssh-bin> <host> <command>`
    #[arg(long, env = "RUNCMD_SSH", default_value = "ssh")]
    pub ssh_bin: String,
}

/// Where the host list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    Inline(String),
    File(PathBuf),
    /// Neither `-s` nor `-f` was given. Nothing gets dispatched.
    Empty,
}

/// A validated run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub command: String,
    pub source: HostSource,
    pub batch: Option<BatchConfig>,
    pub timeout: Option<Duration>,
    pub ssh_bin: String,
}

/// What the binary should do with its arguments.
#[derive(Debug)]
pub enum Invocation {
    /// No arguments at all: print this help text and exit cleanly.
    Usage(String),
    /// Flags that don't go together: print the message and exit cleanly.
    Rejected(ConfigError),
    Run(Plan),
}

impl Config {
    /// Parses raw arguments (including the program name) into an [`Invocation`].
    ///
    /// Malformed flags are left to clap, which exits with its own status.
    pub fn invocation_from<I, T>(args: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.len() <= 1 {
            return Ok(Invocation::Usage(Config::command().render_help().to_string()));
        }
        let config = Config::try_parse_from(args)?;
        Ok(match config.plan() {
            Ok(plan) => Invocation::Run(plan),
            Err(err) => Invocation::Rejected(err),
        })
    }

    pub fn plan(self) -> Result<Plan, ConfigError> {
        let servers = self.servers.filter(|s| !s.is_empty());
        let file = self.file.filter(|f| !f.as_os_str().is_empty());
        let source = match (servers, file) {
            (Some(_), Some(_)) => return Err(ConfigError::ExclusiveSources),
            (Some(list), None) => HostSource::Inline(list),
            (None, Some(path)) => HostSource::File(path),
            (None, None) => HostSource::Empty,
        };

        let batch = match (self.rate, self.sleep) {
            (0, 0) => None,
            (0, _) | (_, 0) => return Err(ConfigError::UnpairedBatch),
            (size, secs) => BatchConfig::new(size, Duration::from_secs(secs)),
        };

        Ok(Plan {
            command: self.command,
            source,
            batch,
            timeout: self.timeout.map(Duration::from_secs),
            ssh_bin: self.ssh_bin,
        })
    }
}
