//! External blueprint converter invocation.
//!
//! The converter is a configurable command receiving an absolute source path
//! and an absolute destination path as its final two positional arguments.
//! It is always invoked as an explicit argument list (never through a shell),
//! runs under a hard wall-clock timeout, and is killed and reaped if the
//! timeout elapses. The invocation only counts as successful if a file exists
//! at the destination path afterwards, whatever the exit code claims.

use std::path::Path;
use std::time::Duration;

/// Default wall-clock timeout for a conversion attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Error type for converter invocations.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("converter binary not found or not spawnable: {0}")]
    Spawn(std::io::Error),

    #[error("converter failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("converter timed out after {0:?}")]
    Timeout(Duration),

    #[error("converter exited successfully but produced no file at {0}")]
    OutputMissing(String),

    #[error("converter command is empty")]
    EmptyCommand,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed converter command: program plus fixed leading arguments.
///
/// The source and destination paths are appended per invocation.
#[derive(Debug, Clone)]
pub struct ConverterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ConverterCommand {
    /// Parse a whitespace-separated command template, e.g.
    /// `"python3 scripts/dxf_to_svg.py"`.
    pub fn parse(template: &str) -> Result<Self, ConvertError> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConvertError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Run the converter on `source`, expecting it to write `dest`.
    ///
    /// The child is spawned with `kill_on_drop`, so hitting the timeout
    /// terminates and reaps it rather than leaving an orphan.
    pub async fn run(
        &self,
        source: &Path,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), ConvertError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg(source)
            .arg(dest)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(ConvertError::Spawn)?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            // Dropping the child future kills and reaps the process.
            Err(_) => return Err(ConvertError::Timeout(timeout)),
            Ok(result) => result?,
        };

        if !output.status.success() {
            return Err(ConvertError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        if !dest.exists() {
            return Err(ConvertError::OutputMissing(
                dest.to_string_lossy().to_string(),
            ));
        }

        Ok(())
    }
}
