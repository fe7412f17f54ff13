//! Platform identity: which operating system family and CPU architecture
//! the detector is running on.
//!
//! Both values are read from the [`Runtime`] once and frozen in a
//! [`PlatformIdentity`]. Unknown operating systems are not an error; they map
//! to [`PlatformFamily::Unsupported`] so the rest of the run can degrade.

use std::fmt;

use crate::runtime::Runtime;

/// Operating system family; selects which feature probe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    Linux,
    MacOs,
    Windows,
    Unsupported,
}

impl PlatformFamily {
    pub fn from_os(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "linux" => PlatformFamily::Linux,
            "macos" | "darwin" => PlatformFamily::MacOs,
            "windows" => PlatformFamily::Windows,
            _ => PlatformFamily::Unsupported,
        }
    }
}

/// Coarse CPU instruction-set family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86_64,
    Arm64,
    Other(String),
}

impl Architecture {
    pub fn parse(machine: &str) -> Self {
        match machine.to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Architecture::X86_64,
            "aarch64" | "arm64" => Architecture::Arm64,
            other => Architecture::Other(other.to_string()),
        }
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, Architecture::Arm64)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Arm64 => write!(f, "arm64"),
            Architecture::Other(machine) => write!(f, "{}", machine),
        }
    }
}

/// Operating system and architecture of the host, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    os: String,
    machine: String,
    family: PlatformFamily,
    architecture: Architecture,
}

impl PlatformIdentity {
    pub fn new(os: impl Into<String>, machine: impl Into<String>) -> Self {
        let os = os.into();
        let machine = machine.into();
        Self {
            family: PlatformFamily::from_os(&os),
            architecture: Architecture::parse(&machine),
            os,
            machine,
        }
    }

    /// Query the host through the runtime.
    pub fn detect(runtime: &dyn Runtime) -> Self {
        let identity = Self::new(runtime.os(), runtime.arch());
        log::debug!(
            "Detected platform {:?} on {}",
            identity.family,
            identity.architecture
        );
        identity
    }

    pub fn family(&self) -> PlatformFamily {
        self.family
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    /// Raw machine string as reported by the host.
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// Operating system name as the kernel reports it (`Darwin` on macOS).
    pub fn system_name(&self) -> &str {
        match self.family {
            PlatformFamily::Linux => "Linux",
            PlatformFamily::MacOs => "Darwin",
            PlatformFamily::Windows => "Windows",
            PlatformFamily::Unsupported => &self.os,
        }
    }
}
