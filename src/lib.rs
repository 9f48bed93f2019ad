//! runcmd: run one command on many servers over SSH.

// Command line arguments and configuration.
pub mod config;
// How to parse and represent hosts.
pub mod host;
// Running a command on one host.
pub mod executor;
// Fanning the command out and collecting results.
pub mod dispatch;
// Error handling.
pub mod error;

pub use config::{Config, HostSource, Invocation, Plan};
pub use dispatch::{BatchConfig, Dispatcher, HostResult, Summary, spawn_host};
pub use error::{ConfigError, RuncmdError};
pub use executor::{Executor, SshExecutor};
pub use host::{Host, get_hosts, parse_host_file, parse_inline};
