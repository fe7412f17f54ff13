use async_trait::async_trait;
use std::time::Duration;

use super::{FeatureProbe, ProbeReport, Source, TokenRule, field_value, scan};
use crate::feature::{FeatureFlag, FeatureSet};
use crate::platform::PlatformFamily;
use crate::runtime::Runtime;

/// Scans `sysctl -a`. Only the baseline AVX512 family is recognized; VNNI,
/// BF16 and AMX are never reported on this platform.
pub struct MacOsProbe {
    inventory: Source,
    timeout: Duration,
}

impl MacOsProbe {
    pub const FLAGS: [FeatureFlag; 4] = [
        FeatureFlag::Avx512f,
        FeatureFlag::Avx512Vnni,
        FeatureFlag::Avx512Bf16,
        FeatureFlag::AmxBf16,
    ];

    pub const RULES: &'static [TokenRule] = &[TokenRule::new(FeatureFlag::Avx512f, &["avx512"])];

    pub fn new(timeout: Duration) -> Self {
        Self {
            inventory: Source::command("sysctl", &["-a"]),
            timeout,
        }
    }
}

#[async_trait]
impl FeatureProbe for MacOsProbe {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::MacOs
    }

    #[tracing::instrument(skip(self, runtime))]
    async fn probe(&self, runtime: &dyn Runtime) -> ProbeReport {
        let mut report = ProbeReport::new(FeatureSet::with_flags(&Self::FLAGS));

        match self.inventory.read(runtime, self.timeout).await {
            Ok(text) => {
                report
                    .features
                    .merge_from(&scan(&text, &Self::FLAGS, Self::RULES));
                report.cpu_model = field_value(&text, "machdep.cpu.brand_string");
            }
            Err(err) => report.source_unavailable(err),
        }

        report
    }
}
