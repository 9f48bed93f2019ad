use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use runcmd::{Config, Dispatcher, Invocation, Plan, RuncmdError, SshExecutor, get_hosts};

async fn run(plan: Plan) -> Result<(), RuncmdError> {
    // An unreadable host file ends the run before anything is dispatched.
    let hosts = get_hosts(&plan.source)?;

    let executor = SshExecutor::new()
        .with_program(plan.ssh_bin)
        .with_timeout(plan.timeout);
    let dispatcher = Dispatcher::new(Arc::new(executor)).with_batch(plan.batch);

    // Per-host failures are already part of the output; they don't change the exit status.
    let mut stdout = std::io::stdout();
    dispatcher
        .run(hosts, &plan.command, &mut stdout)
        .await
        .map_err(RuncmdError::Output)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let invocation = match Config::invocation_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(err) => err.exit(),
    };

    match invocation {
        Invocation::Usage(help) => {
            println!("{}", help);
            ExitCode::SUCCESS
        }
        Invocation::Rejected(err) => {
            println!("{}", err);
            ExitCode::SUCCESS
        }
        Invocation::Run(plan) => match run(plan).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{} {}", "[runcmd]".red().bold(), err);
                ExitCode::FAILURE
            }
        },
    }
}
