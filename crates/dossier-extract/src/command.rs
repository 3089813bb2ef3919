//! External command execution with per-command timeouts.

use std::time::Duration;

use tokio::process::Command;

use dossier_core::{Error, Result};

async fn output_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<std::process::Output> {
    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| Error::Internal(format!("External command timed out after {}s", timeout_secs)))?
        .map_err(|e| Error::Internal(format!("Failed to execute command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Internal(format!(
            "Command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(output)
}

/// Run a command with a timeout, returning stdout as a string.
pub async fn run_cmd_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<String> {
    let output = output_with_timeout(cmd, timeout_secs).await?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command that writes its results to files rather than stdout.
pub async fn run_cmd_status(cmd: &mut Command, timeout_secs: u64) -> Result<()> {
    output_with_timeout(cmd, timeout_secs).await.map(|_| ())
}
