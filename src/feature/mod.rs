//! CPU feature flags and the sets the probes build from them.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A named CPU instruction-set capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    Avx512f,
    Avx512Vnni,
    Avx512Bf16,
    AmxBf16,
    AmxTile,
    AmxInt8,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 6] = [
        FeatureFlag::Avx512f,
        FeatureFlag::Avx512Vnni,
        FeatureFlag::Avx512Bf16,
        FeatureFlag::AmxBf16,
        FeatureFlag::AmxTile,
        FeatureFlag::AmxInt8,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureFlag::Avx512f => "avx512f",
            FeatureFlag::Avx512Vnni => "avx512_vnni",
            FeatureFlag::Avx512Bf16 => "avx512_bf16",
            FeatureFlag::AmxBf16 => "amx_bf16",
            FeatureFlag::AmxTile => "amx_tile",
            FeatureFlag::AmxInt8 => "amx_int8",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detection result per flag.
///
/// A set knows which flags its platform defines (the keys) and whether each
/// was seen. Looking up a flag the set does not define yields `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSet {
    flags: BTreeMap<FeatureFlag, bool>,
}

impl FeatureSet {
    /// A set defining `flags`, all initially absent.
    pub fn with_flags(flags: &[FeatureFlag]) -> Self {
        Self {
            flags: flags.iter().map(|flag| (*flag, false)).collect(),
        }
    }

    /// Mark `flag` as present, defining it if needed.
    pub fn insert(&mut self, flag: FeatureFlag) {
        self.flags.insert(flag, true);
    }

    pub fn contains(&self, flag: FeatureFlag) -> bool {
        self.flags.get(&flag).copied().unwrap_or(false)
    }

    pub fn contains_all(&self, flags: &[FeatureFlag]) -> bool {
        flags.iter().all(|flag| self.contains(*flag))
    }

    /// Flag-wise OR of two sets over the union of their defined flags.
    ///
    /// Idempotent, commutative and associative: a flag is present in the
    /// result if any input reported it.
    pub fn merge(&self, other: &FeatureSet) -> FeatureSet {
        let mut merged = self.clone();
        merged.merge_from(other);
        merged
    }

    /// In-place form of [`FeatureSet::merge`].
    pub fn merge_from(&mut self, other: &FeatureSet) {
        for (flag, present) in &other.flags {
            let entry = self.flags.entry(*flag).or_insert(false);
            *entry |= *present;
        }
    }

    /// True if at least one flag was positively detected.
    pub fn any_detected(&self) -> bool {
        self.flags.values().any(|present| *present)
    }

    /// True if the set defines no flags at all.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureFlag, bool)> + '_ {
        self.flags.iter().map(|(flag, present)| (*flag, *present))
    }

    pub fn detected(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        self.iter()
            .filter(|(_, present)| *present)
            .map(|(flag, _)| flag)
    }
}

impl FromIterator<(FeatureFlag, bool)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (FeatureFlag, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}
