//! Bounded execution of external commands.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout as with_timeout;

use super::RealRuntime;

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Reasons a command produced no output at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The program is not installed or not on `PATH`.
    NotFound(String),
    /// The program did not finish within the allotted time.
    TimedOut { program: String, timeout: Duration },
    /// Spawning or waiting failed for another reason.
    Io { program: String, message: String },
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotFound(program) => write!(f, "command not found: {}", program),
            CommandError::TimedOut { program, timeout } => {
                write!(f, "{} timed out after {}s", program, timeout.as_secs_f32())
            }
            CommandError::Io { program, message } => {
                write!(f, "failed to execute {}: {}", program, message)
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn run_command_impl(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);

        let output = match with_timeout(timeout, cmd.output()).await {
            Err(_) => {
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    timeout,
                });
            }
            Ok(Err(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CommandError::NotFound(program.to_string()));
            }
            Ok(Err(err)) => {
                return Err(CommandError::Io {
                    program: program.to_string(),
                    message: err.to_string(),
                });
            }
            Ok(Ok(output)) => output,
        };

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
