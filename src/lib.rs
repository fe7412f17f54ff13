//! Host CPU capability probe for choosing a prebuilt vLLM CPU package.
//!
//! The detector identifies the platform, probes for AVX512/AMX feature
//! flags, and picks the most capable package from an ordered catalog whose
//! requirements the host meets.

pub mod app;
pub mod catalog;
pub mod config;
pub mod feature;
pub mod platform;
pub mod probe;
pub mod report;
pub mod runtime;
