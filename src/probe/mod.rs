//! Feature probes: one per platform family.
//!
//! Each probe consults its own data sources through the [`Runtime`], scans
//! them for known feature tokens and merges what it finds. A source that
//! cannot be read is reported as a [`Notice`] and otherwise ignored, so a
//! probe always yields a well-formed [`ProbeReport`].

mod linux;
mod macos;
mod scan;
mod source;
mod unsupported;
mod windows;

use async_trait::async_trait;
use std::fmt;

use crate::config::DetectConfig;
use crate::feature::FeatureSet;
use crate::platform::{PlatformFamily, PlatformIdentity};
use crate::runtime::Runtime;

pub use linux::LinuxProbe;
pub use macos::MacOsProbe;
pub use scan::{TokenRule, field_value, scan};
pub use source::{Source, SourceError};
pub use unsupported::UnsupportedProbe;
pub use windows::WindowsProbe;

/// Display value when no source names the CPU model.
pub const UNKNOWN_CPU: &str = "Unknown CPU";

/// Something the user should know about how detection went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A data source contributed nothing.
    SourceUnavailable(SourceError),
    /// The platform has no detection yet; features must be checked by hand.
    NotImplemented { platform: String },
    /// The operating system is not one the detector knows.
    UnsupportedPlatform { os: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SourceUnavailable(err) => write!(f, "{}", err),
            Notice::NotImplemented { platform } => write!(
                f,
                "{} CPU detection not yet implemented. Please check CPU features manually",
                platform
            ),
            Notice::UnsupportedPlatform { os } => {
                write!(f, "Unsupported operating system: {}", os)
            }
        }
    }
}

/// Everything a probe learned in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub features: FeatureSet,
    pub cpu_model: Option<String>,
    pub notices: Vec<Notice>,
}

impl ProbeReport {
    pub fn new(features: FeatureSet) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }

    /// The CPU model for display, or [`UNKNOWN_CPU`].
    pub fn cpu_model_or_unknown(&self) -> &str {
        self.cpu_model.as_deref().unwrap_or(UNKNOWN_CPU)
    }

    fn source_unavailable(&mut self, err: SourceError) {
        log::info!("{}", err);
        self.notices.push(Notice::SourceUnavailable(err));
    }
}

/// Produces a [`FeatureSet`] for one platform family.
#[async_trait]
pub trait FeatureProbe: Send + Sync {
    fn family(&self) -> PlatformFamily;

    async fn probe(&self, runtime: &dyn Runtime) -> ProbeReport;
}

/// Select the probe for the host's platform family.
pub fn probe_for(identity: &PlatformIdentity, config: &DetectConfig) -> Box<dyn FeatureProbe> {
    match identity.family() {
        PlatformFamily::Linux => Box::new(LinuxProbe::new(
            Source::file(config.cpuinfo_path.clone()),
            config.command_timeout,
        )),
        PlatformFamily::MacOs => Box::new(MacOsProbe::new(config.command_timeout)),
        PlatformFamily::Windows => Box::new(WindowsProbe),
        PlatformFamily::Unsupported => Box::new(UnsupportedProbe::new(identity.system_name())),
    }
}
