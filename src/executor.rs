use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::RuncmdError;
use crate::host::Host;

/// Runs one command on one host.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Returns the command's raw stdout, or why it failed.
    async fn run(&self, host: &Host, command: &str) -> Result<Vec<u8>, RuncmdError>;
}

/// Shells out to an external SSH client as `<program> <host> <command>`.
///
/// Authentication is entirely up to the client's own configuration.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    program: String,
    timeout: Option<Duration>,
}

impl SshExecutor {
    pub fn new() -> Self {
        Self {
            program: "ssh".to_string(),
            timeout: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for SshExecutor {
    async fn run(&self, host: &Host, command: &str) -> Result<Vec<u8>, RuncmdError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&host.hostname)
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(%host, program = %self.program, "Spawning SSH client");
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| RuncmdError::Timeout(limit))??,
            None => cmd.output().await?,
        };

        if !output.status.success() {
            return Err(RuncmdError::Exit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}
