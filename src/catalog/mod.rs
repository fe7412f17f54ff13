//! The ordered catalog of prebuilt variants and the recommendation engine.
//!
//! Tiers are listed from most to least demanding. Selection walks them in
//! order and takes the first whose [`Requirement`] holds; the catalog always
//! ends in an unconditional fallback, so every input yields exactly one
//! package.

use serde::Serialize;

use crate::feature::{FeatureFlag, FeatureSet};
use crate::platform::Architecture;

/// Package chosen when nothing more specific applies.
pub const BASE_PACKAGE: &str = "vllm-cpu";

/// Hardware a tier needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any machine.
    Always,
    /// An x86_64 CPU reporting every listed flag.
    X86_64(&'static [FeatureFlag]),
}

impl Requirement {
    pub fn is_satisfied(&self, architecture: &Architecture, features: &FeatureSet) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::X86_64(flags) => {
                *architecture == Architecture::X86_64 && features.contains_all(flags)
            }
        }
    }
}

/// One entry in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantTier {
    pub package: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub requirement: Requirement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tiers: Vec<VariantTier>,
    fallback: VariantTier,
}

impl Catalog {
    /// `tiers` in precedence order, followed by the unconditional `fallback`.
    pub fn new(tiers: Vec<VariantTier>, fallback: VariantTier) -> Self {
        Self { tiers, fallback }
    }

    pub fn builtin() -> Self {
        use FeatureFlag::*;

        Self::new(
            vec![
                VariantTier {
                    package: "vllm-cpu-amxbf16",
                    description: "AVX512 + VNNI + BF16 + AMX (Intel Sapphire Rapids and newer)",
                    requirement: Requirement::X86_64(&[AmxBf16, Avx512Bf16, Avx512Vnni]),
                },
                VariantTier {
                    package: "vllm-cpu-avx512bf16",
                    description: "AVX512 + VNNI + BF16 (Intel Cooper Lake and newer)",
                    requirement: Requirement::X86_64(&[Avx512Bf16, Avx512Vnni]),
                },
                VariantTier {
                    package: "vllm-cpu-avx512vnni",
                    description: "AVX512 + VNNI (Intel Cascade Lake and newer)",
                    requirement: Requirement::X86_64(&[Avx512Vnni]),
                },
                VariantTier {
                    package: "vllm-cpu-avx512",
                    description: "AVX512 optimized (Intel Skylake-X and newer)",
                    requirement: Requirement::X86_64(&[Avx512f]),
                },
            ],
            VariantTier {
                package: BASE_PACKAGE,
                description: "Base package (no AVX512, supports ARM64 & x86_64)",
                requirement: Requirement::Always,
            },
        )
    }

    /// All entries in precedence order, fallback last.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &VariantTier> {
        self.tiers.iter().chain(std::iter::once(&self.fallback))
    }

    pub fn fallback(&self) -> &VariantTier {
        &self.fallback
    }

    pub fn contains(&self, package: &str) -> bool {
        self.entries().any(|tier| tier.package == package)
    }

    /// First tier whose requirement holds, else the fallback.
    pub fn select(&self, architecture: &Architecture, features: &FeatureSet) -> &VariantTier {
        self.tiers
            .iter()
            .find(|tier| tier.requirement.is_satisfied(architecture, features))
            .unwrap_or(&self.fallback)
    }

    pub fn recommend(&self, architecture: &Architecture, features: &FeatureSet) -> Recommendation {
        let tier = self.select(architecture, features);
        log::debug!("Selected {} for {}", tier.package, architecture);
        Recommendation {
            package: tier.package,
            features: features.clone(),
            architecture: architecture.clone(),
        }
    }
}

/// Outcome of one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub package: &'static str,
    pub features: FeatureSet,
    pub architecture: Architecture,
}

impl Recommendation {
    pub fn install_command(&self) -> String {
        format!("pip install {}", self.package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureFlag::*;

    fn flags(present: &[FeatureFlag]) -> FeatureSet {
        let mut features = FeatureSet::with_flags(&FeatureFlag::ALL);
        for flag in present {
            features.insert(*flag);
        }
        features
    }

    fn package(arch: &str, present: &[FeatureFlag]) -> &'static str {
        Catalog::builtin()
            .recommend(&Architecture::parse(arch), &flags(present))
            .package
    }

    /// Every subset of the known flags.
    fn all_feature_sets() -> Vec<FeatureSet> {
        (0..1u32 << FeatureFlag::ALL.len())
            .map(|mask| {
                let present: Vec<_> = FeatureFlag::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, flag)| *flag)
                    .collect();
                flags(&present)
            })
            .collect()
    }

    #[test]
    fn test_top_tier() {
        assert_eq!(
            package("x86_64", &[Avx512f, Avx512Vnni, Avx512Bf16, AmxBf16]),
            "vllm-cpu-amxbf16"
        );
    }

    #[test]
    fn test_bf16_tier() {
        assert_eq!(
            package("x86_64", &[Avx512f, Avx512Vnni, Avx512Bf16]),
            "vllm-cpu-avx512bf16"
        );
    }

    #[test]
    fn test_vnni_tier() {
        assert_eq!(package("x86_64", &[Avx512f, Avx512Vnni]), "vllm-cpu-avx512vnni");
        assert_eq!(package("x86_64", &[Avx512Vnni]), "vllm-cpu-avx512vnni");
    }

    #[test]
    fn test_baseline_avx512_tier() {
        assert_eq!(package("x86_64", &[Avx512f]), "vllm-cpu-avx512");
    }

    #[test]
    fn test_amx_without_bf16_falls_through() {
        assert_eq!(
            package("x86_64", &[Avx512f, Avx512Vnni, AmxBf16, AmxTile, AmxInt8]),
            "vllm-cpu-avx512vnni"
        );
        assert_eq!(package("x86_64", &[Avx512Bf16]), "vllm-cpu");
    }

    #[test]
    fn test_no_flags_is_base() {
        assert_eq!(package("x86_64", &[]), BASE_PACKAGE);
    }

    #[test]
    fn test_arm_ignores_features() {
        for features in all_feature_sets() {
            for arch in ["arm64", "aarch64"] {
                let rec = Catalog::builtin().recommend(&Architecture::parse(arch), &features);
                assert_eq!(rec.package, BASE_PACKAGE);
            }
        }
    }

    #[test]
    fn test_unknown_architecture_is_base() {
        assert_eq!(package("riscv64", &FeatureFlag::ALL), BASE_PACKAGE);
        assert_eq!(package("i686", &[Avx512f]), BASE_PACKAGE);
    }

    #[test]
    fn test_recommendation_is_total() {
        let catalog = Catalog::builtin();
        for arch in ["x86_64", "arm64", "ppc64le"] {
            for features in all_feature_sets() {
                let rec = catalog.recommend(&Architecture::parse(arch), &features);
                assert!(catalog.contains(rec.package));
            }
        }
        let rec = catalog.recommend(&Architecture::X86_64, &FeatureSet::default());
        assert_eq!(rec.package, BASE_PACKAGE);
    }

    #[test]
    fn test_selected_tier_requirements_hold() {
        let catalog = Catalog::builtin();
        for features in all_feature_sets() {
            let tier = catalog.select(&Architecture::X86_64, &features);
            if let Requirement::X86_64(required) = tier.requirement {
                for flag in required {
                    assert!(features.contains(*flag));
                }
            }
        }
    }

    #[test]
    fn test_first_match_wins() {
        // Every x86_64 tier is satisfiable, and a set satisfying a tier also
        // satisfies each tier below it, yet the strongest is chosen.
        let catalog = Catalog::builtin();
        let top = flags(&[Avx512f, Avx512Vnni, Avx512Bf16, AmxBf16]);
        for tier in catalog.entries() {
            assert!(tier.requirement.is_satisfied(&Architecture::X86_64, &top));
        }
        assert_eq!(catalog.select(&Architecture::X86_64, &top).package, "vllm-cpu-amxbf16");
    }

    #[test]
    fn test_catalog_order_and_fallback() {
        let catalog = Catalog::builtin();
        let packages: Vec<_> = catalog.entries().map(|tier| tier.package).collect();

        assert_eq!(
            packages,
            vec![
                "vllm-cpu-amxbf16",
                "vllm-cpu-avx512bf16",
                "vllm-cpu-avx512vnni",
                "vllm-cpu-avx512",
                "vllm-cpu",
            ]
        );
        assert_eq!(catalog.fallback().requirement, Requirement::Always);
        assert!(!catalog.contains("vllm-cpu-avx2"));
    }

    #[test]
    fn test_custom_catalog_reordering() {
        let tiers: Vec<_> = Catalog::builtin().entries().rev().skip(1).copied().collect();
        let catalog = Catalog::new(tiers, *Catalog::builtin().fallback());

        let top = flags(&[Avx512f, Avx512Vnni, Avx512Bf16, AmxBf16]);
        assert_eq!(catalog.select(&Architecture::X86_64, &top).package, "vllm-cpu-avx512");
    }

    #[test]
    fn test_recommendation_keeps_inputs() {
        let features = flags(&[Avx512f]);
        let rec = Catalog::builtin().recommend(&Architecture::X86_64, &features);

        assert_eq!(rec.features, features);
        assert_eq!(rec.architecture, Architecture::X86_64);
        assert_eq!(rec.install_command(), "pip install vllm-cpu-avx512");
    }
}
