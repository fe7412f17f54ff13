use async_trait::async_trait;

use super::{FeatureProbe, Notice, ProbeReport};
use crate::feature::FeatureSet;
use crate::platform::PlatformFamily;
use crate::runtime::Runtime;

pub struct UnsupportedProbe {
    os: String,
}

impl UnsupportedProbe {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

#[async_trait]
impl FeatureProbe for UnsupportedProbe {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Unsupported
    }

    async fn probe(&self, _runtime: &dyn Runtime) -> ProbeReport {
        log::warn!("Unsupported operating system: {}", self.os);
        let mut report = ProbeReport::new(FeatureSet::default());
        report.notices.push(Notice::UnsupportedPlatform {
            os: self.os.clone(),
        });
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[tokio::test]
    async fn test_unsupported_defines_no_flags() {
        let runtime = MockRuntime::new();

        let report = UnsupportedProbe::new("solaris").probe(&runtime).await;

        assert!(report.features.is_empty());
        assert_eq!(
            report.notices,
            vec![Notice::UnsupportedPlatform {
                os: "solaris".into()
            }]
        );
    }
}
