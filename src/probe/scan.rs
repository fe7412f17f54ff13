//! Token matching over source text.

use crate::feature::{FeatureFlag, FeatureSet};

/// Accepted spellings of one flag. Any spelling occurring anywhere in the
/// text (case-insensitively) marks the flag present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRule {
    pub flag: FeatureFlag,
    pub tokens: &'static [&'static str],
}

impl TokenRule {
    pub const fn new(flag: FeatureFlag, tokens: &'static [&'static str]) -> Self {
        Self { flag, tokens }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.tokens.iter().any(|token| lowered.contains(token))
    }
}

/// Scan `text` and return a set defining `flags`, with each rule's flag set
/// when one of its tokens occurs.
pub fn scan(text: &str, flags: &[FeatureFlag], rules: &[TokenRule]) -> FeatureSet {
    let lowered = text.to_lowercase();
    let mut features = FeatureSet::with_flags(flags);

    for rule in rules.iter().filter(|rule| rule.matches(&lowered)) {
        features.insert(rule.flag);
    }

    features
}

/// Value of the first `key: value` line whose key matches `key`
/// case-insensitively. Empty values are skipped.
pub fn field_value(text: &str, key: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case(key) {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
