//! External process execution.
//!
//! Every external tool (git, 7-Zip, rcedit) is run through [`exec`] so that a
//! failing tool always surfaces the same way: its output is logged as a
//! warning and the error carries the aggregated stdout/stderr.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Errors produced by [`exec`].
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started (missing binary, permissions).
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    ///
    /// `code` is `None` when the process was killed by a signal.
    #[error("{command}: process completed with exit code {}{}", display_code(.code), display_output(.output))]
    NonZero {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

fn display_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!("\n{output}")
    }
}

/// Runs `command` with `args` in the current directory and returns its stdout.
pub async fn exec<S: AsRef<str>>(command: &str, args: &[S]) -> Result<String, ExecError> {
    run(command, args, None).await
}

/// Runs `command` with `args` inside `dir` and returns its stdout.
pub async fn exec_in<S: AsRef<str>>(
    dir: &Path,
    command: &str,
    args: &[S],
) -> Result<String, ExecError> {
    run(command, args, Some(dir)).await
}

async fn run<S: AsRef<str>>(
    command: &str,
    args: &[S],
    dir: Option<&Path>,
) -> Result<String, ExecError> {
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    let mut cmd = Command::new(command);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    debug!(command, ?args, "exec");

    let output = cmd.output().await.map_err(|source| ExecError::Spawn {
        command: command.to_string(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let aggregated = aggregate_output(&stdout, &stderr);
    warn!("{aggregated}");

    Err(ExecError::NonZero {
        command: command.to_string(),
        code: output.status.code(),
        output: aggregated,
    })
}

/// Joins trimmed stdout and stderr with a newline, omitting empty parts.
fn aggregate_output(stdout: &str, stderr: &str) -> String {
    [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
