//! Orchestration of one detection run.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::catalog::{Catalog, Recommendation};
use crate::config::{DetectConfig, OutputFormat};
use crate::feature::FeatureSet;
use crate::platform::{Architecture, PlatformIdentity};
use crate::probe::{ProbeReport, probe_for};
use crate::report::Report;
use crate::runtime::Runtime;

/// Exit code when the report could not be written (for example a closed pipe).
/// Clap already uses 2 for usage errors.
pub const WRITE_FAILURE_EXIT_CODE: u8 = 3;

/// How much the recommendation can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectStatus {
    /// A feature was detected, or the architecture alone decides.
    Confident,
    /// Nothing was detected; the fallback package was chosen defensively.
    Inconclusive,
}

impl DetectStatus {
    pub fn evaluate(architecture: &Architecture, features: &FeatureSet) -> Self {
        if features.any_detected() || architecture.is_arm() {
            DetectStatus::Confident
        } else {
            DetectStatus::Inconclusive
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            DetectStatus::Confident => 0,
            DetectStatus::Inconclusive => 1,
        }
    }
}

/// Map the outcome of [`run`] to the process exit code.
pub fn exit_code(result: &Result<DetectStatus>) -> u8 {
    match result {
        Ok(status) => status.exit_code(),
        Err(_) => WRITE_FAILURE_EXIT_CODE,
    }
}

/// Result of identify, probe and recommend.
#[derive(Debug, Clone)]
pub struct Detection {
    pub identity: PlatformIdentity,
    pub probe: ProbeReport,
    pub recommendation: Recommendation,
    pub status: DetectStatus,
}

#[tracing::instrument(skip_all)]
pub async fn detect(
    runtime: &dyn Runtime,
    config: &DetectConfig,
    catalog: &Catalog,
) -> Detection {
    let identity = PlatformIdentity::detect(runtime);
    let probe = probe_for(&identity, config).probe(runtime).await;
    let recommendation = catalog.recommend(identity.architecture(), &probe.features);
    let status = DetectStatus::evaluate(identity.architecture(), &probe.features);

    log::info!("Recommending {} ({:?})", recommendation.package, status);

    Detection {
        identity,
        probe,
        recommendation,
        status,
    }
}

/// Run a full detection and write the result to `out`.
///
/// Detection itself never fails; the only error is failing to write.
pub async fn run<R: Runtime, W: Write>(
    runtime: &R,
    config: &DetectConfig,
    out: &mut W,
) -> Result<DetectStatus> {
    let catalog = Catalog::builtin();
    let detection = detect(runtime, config, &catalog).await;

    if config.package_only {
        writeln!(out, "{}", detection.recommendation.package)?;
        return Ok(detection.status);
    }

    let report = Report {
        identity: &detection.identity,
        cpu_model: detection.probe.cpu_model_or_unknown(),
        recommendation: &detection.recommendation,
        catalog: &catalog,
        notices: &detection.probe.notices,
        status: detection.status,
    };

    match config.format {
        OutputFormat::Text => write!(out, "{}", report)?,
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
    }
    out.flush()?;

    Ok(detection.status)
}
