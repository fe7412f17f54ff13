use async_trait::async_trait;
use std::time::Duration;

use super::{FeatureProbe, ProbeReport, Source, TokenRule, field_value, scan};
use crate::feature::{FeatureFlag, FeatureSet};
use crate::platform::PlatformFamily;
use crate::runtime::Runtime;

/// Reads the kernel's CPU descriptor, then asks `lscpu` for a second opinion.
pub struct LinuxProbe {
    cpu_descriptor: Source,
    inventory: Source,
    timeout: Duration,
}

impl LinuxProbe {
    pub const FLAGS: [FeatureFlag; 6] = FeatureFlag::ALL;

    pub const RULES: &'static [TokenRule] = &[
        TokenRule::new(FeatureFlag::Avx512f, &["avx512f"]),
        TokenRule::new(FeatureFlag::Avx512Vnni, &["avx512_vnni", "avx512vnni"]),
        TokenRule::new(FeatureFlag::Avx512Bf16, &["avx512_bf16", "avx512bf16"]),
        TokenRule::new(FeatureFlag::AmxBf16, &["amx_bf16"]),
        TokenRule::new(FeatureFlag::AmxTile, &["amx_tile"]),
        TokenRule::new(FeatureFlag::AmxInt8, &["amx_int8"]),
    ];

    pub fn new(cpu_descriptor: Source, timeout: Duration) -> Self {
        Self {
            cpu_descriptor,
            inventory: Source::command("lscpu", &[]),
            timeout,
        }
    }

    /// Replace the inventory command (`lscpu` by default).
    #[cfg(test)]
    pub(crate) fn with_inventory(mut self, inventory: Source) -> Self {
        self.inventory = inventory;
        self
    }
}

#[async_trait]
impl FeatureProbe for LinuxProbe {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Linux
    }

    #[tracing::instrument(skip(self, runtime))]
    async fn probe(&self, runtime: &dyn Runtime) -> ProbeReport {
        let mut report = ProbeReport::new(FeatureSet::with_flags(&Self::FLAGS));

        for source in [&self.cpu_descriptor, &self.inventory] {
            match source.read(runtime, self.timeout).await {
                Ok(text) => {
                    let found = scan(&text, &Self::FLAGS, Self::RULES);
                    log::debug!(
                        "{} reported {:?}",
                        source,
                        found.detected().collect::<Vec<_>>()
                    );
                    report.features.merge_from(&found);
                    if report.cpu_model.is_none() {
                        report.cpu_model = field_value(&text, "model name");
                    }
                }
                Err(err) => report.source_unavailable(err),
            }
        }

        report
    }
}
