//! Fan-out of one command to every host.
//!
//! Every host gets its own task, and all of them start right away. A batch
//! configuration only paces how fast results are drained and printed. It never
//! bounds how many SSH clients run at once.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::RuncmdError;
use crate::executor::Executor;
use crate::host::Host;

/// Pause `delay` after every `size` consumed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    size: usize,
    delay: Duration,
}

impl BatchConfig {
    /// Returns `None` for a zero `size`, which means no throttling.
    pub fn new(size: usize, delay: Duration) -> Option<Self> {
        (size > 0).then_some(Self { size, delay })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Outcome of running the command on one host.
#[derive(Debug)]
pub struct HostResult {
    pub host: Host,
    pub outcome: Result<Vec<u8>, RuncmdError>,
}

impl HostResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl fmt::Display for HostResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.outcome {
            Ok(stdout) => writeln!(
                f,
                "{} result: {}",
                self.host,
                String::from_utf8_lossy(stdout)
            ),
            // No trailing newline here.
            Err(err) => write!(f, "Error processing {}: {}", self.host, err),
        }
    }
}

/// Counts of what came back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    fn record(&mut self, result: &HostResult) {
        if result.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Spawns a task that runs `command` on `host` and reports exactly once.
pub fn spawn_host(
    executor: Arc<dyn Executor>,
    host: Host,
    command: Arc<str>,
    result_tx: flume::Sender<HostResult>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        debug!(%host, "Dispatching");
        let outcome = executor.run(&host, &command).await;
        if let Err(err) = &outcome {
            warn!(%host, error = %err, "Command failed");
            if let RuncmdError::Exit { stderr, .. } = err {
                debug!(%host, %stderr, "SSH client stderr");
            }
        }
        // The receiver only goes away if the dispatcher itself is gone.
        let _ = result_tx.send_async(HostResult { host, outcome }).await;
    })
}

pub struct Dispatcher {
    executor: Arc<dyn Executor>,
    batch: Option<BatchConfig>,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            executor,
            batch: None,
        }
    }

    pub fn with_batch(mut self, batch: Option<BatchConfig>) -> Self {
        self.batch = batch;
        self
    }

    /// Runs `command` on every host and writes each result to `out`.
    ///
    /// Without a batch configuration, nothing is written until the last
    /// result has arrived. With one, results are written as they arrive and
    /// the dispatcher sleeps after every `size`-th. Either way results come
    /// out in completion order, not host order.
    pub async fn run<W: Write>(
        &self,
        hosts: Vec<Host>,
        command: &str,
        out: &mut W,
    ) -> std::io::Result<Summary> {
        let num_hosts = hosts.len();
        let command: Arc<str> = Arc::from(command);

        // MPMC channel (used as MPSC) for workers to hand back their result.
        let (result_tx, result_rx) = flume::bounded(num_hosts);
        for host in hosts {
            spawn_host(
                Arc::clone(&self.executor),
                host,
                Arc::clone(&command),
                result_tx.clone(),
            );
        }
        // Once every worker has reported or died, recv errors out instead of hanging.
        drop(result_tx);

        let mut summary = Summary::default();
        match self.batch {
            None => {
                let mut results = Vec::with_capacity(num_hosts);
                while results.len() < num_hosts {
                    match result_rx.recv_async().await {
                        Ok(result) => results.push(result),
                        Err(_) => break,
                    }
                }
                for result in &results {
                    summary.record(result);
                    write!(out, "{}", result)?;
                }
                out.flush()?;
            }
            Some(batch) => {
                for consumed in 1..=num_hosts {
                    let result = match result_rx.recv_async().await {
                        Ok(result) => result,
                        Err(_) => break,
                    };
                    summary.record(&result);
                    write!(out, "{}", result)?;
                    out.flush()?;
                    if consumed % batch.size == 0 && consumed < num_hosts {
                        info!(delay = ?batch.delay, consumed, "Pausing between batches");
                        tokio::time::sleep(batch.delay).await;
                    }
                }
            }
        }

        if summary.total() < num_hosts {
            warn!(
                expected = num_hosts,
                received = summary.total(),
                "Some workers exited without reporting"
            );
        }
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "All hosts done"
        );
        Ok(summary)
    }
}
