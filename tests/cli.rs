//! Exit status and stdout of the `runcmd` binary.

use std::process::{Command, Output};

fn runcmd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_runcmd"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run the runcmd binary.")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_no_arguments_prints_usage_and_exits_zero() {
    let output = runcmd(&[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn test_both_sources_exit_zero_without_dispatch() {
    let output = runcmd(&["-s", "h1", "-f", "hosts.txt", "--ssh-bin", "/nonexistent/ssh"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output).trim_end(),
        "Please provide only one parameter at time: -s or -f."
    );
}

#[test]
fn test_unpaired_batch_flags_exit_zero_without_dispatch() {
    for flags in [["-r", "2"], ["-t", "1"]] {
        let mut args = vec!["-s", "h1", "--ssh-bin", "/nonexistent/ssh"];
        args.extend_from_slice(&flags);
        let output = runcmd(&args);
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(
            stdout(&output).trim_end(),
            "Please provide two parameters simultaneously: -r and -t."
        );
    }
}

#[test]
fn test_missing_host_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("hosts.txt");
    let output = runcmd(&["-f", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read host file"));
}

#[cfg(unix)]
#[test]
fn test_failed_hosts_still_exit_zero() {
    // `false` ignores its arguments and exits 1, standing in for an unreachable host.
    let output = runcmd(&["-s", "h1 h2", "--ssh-bin", "false"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Error processing h1: exit status: 1"));
    assert!(out.contains("Error processing h2: exit status: 1"));
    // Piped stderr gets plain log lines.
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("Command failed"));
    assert!(!err.contains('\x1b'));
}
