//! Textual data sources a probe inspects.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::runtime::{CommandError, Runtime};

/// A file or command whose text may mention feature tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Command { program: String, args: Vec<String> },
}

/// Why a source contributed nothing. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Unreadable { path: PathBuf, message: String },
    CommandMissing(String),
    CommandTimedOut { command: String, timeout: Duration },
    CommandFailed { command: String, code: Option<i32> },
    /// The command could not be started or waited on.
    CommandError { command: String, message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unreadable { path, message } => {
                write!(f, "Could not read {}: {}", path.display(), message)
            }
            SourceError::CommandMissing(program) => {
                write!(f, "{} is not available", program)
            }
            SourceError::CommandTimedOut { command, timeout } => {
                write!(f, "{} did not finish within {}s", command, timeout.as_secs())
            }
            SourceError::CommandFailed {
                command,
                code: Some(code),
            } => write!(f, "{} exited with status {}", command, code),
            SourceError::CommandFailed { command, code: None } => {
                write!(f, "{} was terminated by a signal", command)
            }
            SourceError::CommandError { command, message } => {
                write!(f, "{} could not be run: {}", command, message)
            }
        }
    }
}

impl std::error::Error for SourceError {}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Source::File(path.into())
    }

    pub fn command(program: &str, args: &[&str]) -> Self {
        Source::Command {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Fetch the source text. Commands get a single attempt bounded by
    /// `timeout`; only output of a successful run is returned.
    pub async fn read(
        &self,
        runtime: &dyn Runtime,
        timeout: Duration,
    ) -> Result<String, SourceError> {
        match self {
            Source::File(path) => runtime.read_to_string(path).map_err(|err| {
                SourceError::Unreadable {
                    path: path.clone(),
                    message: err.root_cause().to_string(),
                }
            }),
            Source::Command { program, args } => {
                let output = runtime
                    .run_command(program, args, timeout)
                    .await
                    .map_err(|err| match err {
                        CommandError::NotFound(program) => SourceError::CommandMissing(program),
                        CommandError::TimedOut { timeout, .. } => SourceError::CommandTimedOut {
                            command: self.to_string(),
                            timeout,
                        },
                        CommandError::Io { message, .. } => SourceError::CommandError {
                            command: self.to_string(),
                            message,
                        },
                    })?;

                if !output.success() {
                    return Err(SourceError::CommandFailed {
                        command: self.to_string(),
                        code: output.code,
                    });
                }
                Ok(output.stdout)
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Command { program, args } if args.is_empty() => write!(f, "{}", program),
            Source::Command { program, args } => write!(f, "{} {}", program, args.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{CommandOutput, MockRuntime};
    use anyhow::anyhow;
    use std::path::Path;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_source_display() {
        assert_eq!(Source::file("/proc/cpuinfo").to_string(), "/proc/cpuinfo");
        assert_eq!(Source::command("lscpu", &[]).to_string(), "lscpu");
        assert_eq!(Source::command("sysctl", &["-a"]).to_string(), "sysctl -a");
    }

    #[tokio::test]
    async fn test_file_source_reads_text() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .withf(|path| path == Path::new("/proc/cpuinfo"))
            .returning(|_| Ok("flags: avx512f".to_string()));

        let text = Source::file("/proc/cpuinfo")
            .read(&runtime, TIMEOUT)
            .await
            .unwrap();

        assert_eq!(text, "flags: avx512f");
    }

    #[tokio::test]
    async fn test_file_source_unreadable() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow!("No such file or directory")));

        let err = Source::file("/proc/cpuinfo")
            .read(&runtime, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SourceError::Unreadable {
                path: PathBuf::from("/proc/cpuinfo"),
                message: "No such file or directory".into(),
            }
        );
        assert!(err.to_string().starts_with("Could not read /proc/cpuinfo"));
    }

    #[tokio::test]
    async fn test_command_source_passes_args_and_timeout() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run_command()
            .withf(|program, args, timeout| {
                program == "sysctl" && args.len() == 1 && args[0] == "-a" && *timeout == TIMEOUT
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(CommandOutput {
                    code: Some(0),
                    stdout: "hw.optional.avx512f: 1".into(),
                })
            });

        let text = Source::command("sysctl", &["-a"])
            .read(&runtime, TIMEOUT)
            .await
            .unwrap();

        assert_eq!(text, "hw.optional.avx512f: 1");
    }

    #[tokio::test]
    async fn test_command_source_nonzero_exit() {
        let mut runtime = MockRuntime::new();
        runtime.expect_run_command().returning(|_, _, _| {
            Ok(CommandOutput {
                code: Some(1),
                stdout: "avx512f".into(),
            })
        });

        let err = Source::command("lscpu", &[])
            .read(&runtime, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SourceError::CommandFailed {
                command: "lscpu".into(),
                code: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn test_command_source_missing_and_timeout() {
        let mut missing = MockRuntime::new();
        missing
            .expect_run_command()
            .returning(|program, _, _| Err(CommandError::NotFound(program.to_string())));

        let err = Source::command("lscpu", &[])
            .read(&missing, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::CommandMissing("lscpu".into()));

        let mut slow = MockRuntime::new();
        slow.expect_run_command().returning(|program, _, timeout| {
            Err(CommandError::TimedOut {
                program: program.to_string(),
                timeout,
            })
        });

        let err = Source::command("lscpu", &[])
            .read(&slow, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SourceError::CommandTimedOut {
                command: "lscpu".into(),
                timeout: TIMEOUT,
            }
        );
        assert_eq!(err.to_string(), "lscpu did not finish within 5s");
    }

    #[tokio::test]
    async fn test_command_source_spawn_failure_keeps_reason() {
        let mut runtime = MockRuntime::new();
        runtime.expect_run_command().returning(|program, _, _| {
            Err(CommandError::Io {
                program: program.to_string(),
                message: "Permission denied (os error 13)".into(),
            })
        });

        let err = Source::command("lscpu", &[])
            .read(&runtime, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SourceError::CommandError {
                command: "lscpu".into(),
                message: "Permission denied (os error 13)".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "lscpu could not be run: Permission denied (os error 13)"
        );
        assert!(!err.to_string().contains("signal"));
    }
}
