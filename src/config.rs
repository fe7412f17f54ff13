use anyhow::{Result, bail};
use std::path::PathBuf;
use std::time::Duration;

/// Where Linux exposes the CPU descriptor text.
pub const DEFAULT_CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Upper bound for each external inventory command.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Machine-readable report
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectConfig {
    pub cpuinfo_path: PathBuf,
    pub command_timeout: Duration,
    pub format: OutputFormat,
    /// Print nothing but the chosen package identifier.
    pub package_only: bool,
}

impl DetectConfig {
    pub fn new(
        cpuinfo_path: Option<PathBuf>,
        timeout_secs: u64,
        format: OutputFormat,
        package_only: bool,
    ) -> Result<Self> {
        if timeout_secs == 0 {
            bail!("Command timeout must be at least one second");
        }

        Ok(Self {
            cpuinfo_path: cpuinfo_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CPUINFO_PATH)),
            command_timeout: Duration::from_secs(timeout_secs),
            format,
            package_only,
        })
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            cpuinfo_path: PathBuf::from(DEFAULT_CPUINFO_PATH),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            format: OutputFormat::Text,
            package_only: false,
        }
    }
}
