//! Runtime abstraction for host access.
//!
//! Everything the detector learns about the machine goes through the
//! [`Runtime`] trait, so probes can be exercised against fake CPU descriptors
//! and failing commands without touching the real system.
//!
//! # Structure
//!
//! - `env` - Operating system and architecture identity
//! - `fs` - Reading text sources from disk
//! - `command` - Bounded execution of external inventory commands

mod command;
mod env;
mod fs;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

pub use command::{CommandError, CommandOutput};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Identity
    /// Operating system name (`linux`, `macos`, `windows`, ...).
    fn os(&self) -> String;
    /// Machine architecture string (`x86_64`, `aarch64`, ...).
    fn arch(&self) -> String;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;

    // Processes
    /// Run `program` with `args`, giving up after `timeout`.
    ///
    /// The child never receives any input. A non-zero exit is not an error
    /// here; callers inspect [`CommandOutput::success`].
    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError>;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn os(&self) -> String {
        self.os_impl()
    }

    fn arch(&self) -> String {
        self.arch_impl()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        self.run_command_impl(program, args, timeout).await
    }
}
