//! Rendering of the detection summary.
//!
//! [`Report`] borrows everything a run produced and formats it either as the
//! human-readable text report (its `Display` impl) or as JSON. Rendering has
//! no side effects; the caller decides where the text goes.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::app::DetectStatus;
use crate::catalog::{BASE_PACKAGE, Catalog, Recommendation, VariantTier};
use crate::feature::{FeatureFlag, FeatureSet};
use crate::platform::PlatformIdentity;
use crate::probe::Notice;

const WIDTH: usize = 70;
const CHOSEN_MARKER: &str = "👉";

pub struct Report<'a> {
    pub identity: &'a PlatformIdentity,
    pub cpu_model: &'a str,
    pub recommendation: &'a Recommendation,
    pub catalog: &'a Catalog,
    pub notices: &'a [Notice],
    pub status: DetectStatus,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    platform: &'a str,
    architecture: &'a str,
    cpu_model: &'a str,
    features: &'a FeatureSet,
    package: &'a str,
    install_command: String,
    status: DetectStatus,
    notices: Vec<String>,
    catalog: Vec<JsonTier<'a>>,
}

#[derive(Serialize)]
struct JsonTier<'a> {
    #[serde(flatten)]
    tier: &'a VariantTier,
    recommended: bool,
}

impl Report<'_> {
    pub fn to_json(&self) -> Result<String> {
        let report = JsonReport {
            platform: self.identity.system_name(),
            architecture: self.identity.machine(),
            cpu_model: self.cpu_model,
            features: &self.recommendation.features,
            package: self.recommendation.package,
            install_command: self.recommendation.install_command(),
            status: self.status,
            notices: self.notices.iter().map(|n| n.to_string()).collect(),
            catalog: self
                .catalog
                .entries()
                .map(|tier| JsonTier {
                    tier,
                    recommended: tier.package == self.recommendation.package,
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Flags sorted by name.
    fn sorted_features(&self) -> Vec<(FeatureFlag, bool)> {
        let mut features: Vec<_> = self.recommendation.features.iter().collect();
        features.sort_by_key(|(flag, _)| flag.as_str());
        features
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(WIDTH))
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(WIDTH);
        writeln!(f, "{}", rule)?;
        writeln!(f, "vLLM CPU Package Detector")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        if !self.notices.is_empty() {
            section(f, "Notices:")?;
            for notice in self.notices {
                writeln!(f, "  - {}", notice)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "System:       {}", self.identity.system_name())?;
        writeln!(f, "Architecture: {}", self.identity.machine())?;
        writeln!(f, "CPU Model:    {}", self.cpu_model)?;
        writeln!(f)?;

        section(f, "Detected CPU Features:")?;
        if self.recommendation.features.is_empty() {
            writeln!(f, "  (No features detected)")?;
        } else {
            for (flag, supported) in self.sorted_features() {
                let (mark, label) = if supported {
                    ("✓", "Supported")
                } else {
                    ("✗", "Not Supported")
                };
                let name = flag.as_str().to_uppercase();
                writeln!(f, "  {} {:<20} {}", mark, name, label)?;
            }
        }
        writeln!(f)?;

        section(f, "Recommended Package:")?;
        writeln!(f, "  {}", self.recommendation.package)?;
        writeln!(f)?;

        section(f, "Installation Command:")?;
        writeln!(f, "  {}", self.recommendation.install_command())?;
        writeln!(f)?;

        // Listed from the base package upward.
        section(f, "All Available Packages:")?;
        for tier in self.catalog.entries().rev() {
            let marker = if tier.package == self.recommendation.package {
                CHOSEN_MARKER
            } else {
                "  "
            };
            writeln!(f, "  {} {:<25} - {}", marker, tier.package, tier.description)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", rule)?;

        if self.status == DetectStatus::Inconclusive {
            writeln!(f)?;
            writeln!(f, "⚠️  Warning: Could not detect CPU features reliably")?;
            writeln!(f, "   Defaulting to base package ({})", BASE_PACKAGE)?;
        }

        Ok(())
    }
}
