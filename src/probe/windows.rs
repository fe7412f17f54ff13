use async_trait::async_trait;

use super::{FeatureProbe, Notice, ProbeReport};
use crate::feature::{FeatureFlag, FeatureSet};
use crate::platform::PlatformFamily;
use crate::runtime::Runtime;

/// Windows exposes these flags only through a native CPUID query, which is
/// not wired up. The probe returns the flag set with nothing detected.
pub struct WindowsProbe;

impl WindowsProbe {
    pub const FLAGS: [FeatureFlag; 4] = [
        FeatureFlag::Avx512f,
        FeatureFlag::Avx512Vnni,
        FeatureFlag::Avx512Bf16,
        FeatureFlag::AmxBf16,
    ];
}

#[async_trait]
impl FeatureProbe for WindowsProbe {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Windows
    }

    async fn probe(&self, _runtime: &dyn Runtime) -> ProbeReport {
        log::warn!("Windows CPU detection not yet implemented");
        let mut report = ProbeReport::new(FeatureSet::with_flags(&Self::FLAGS));
        report.notices.push(Notice::NotImplemented {
            platform: "Windows".to_string(),
        });
        report
    }
}
