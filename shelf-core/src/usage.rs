//! Per-provider and per-category reference counts.

use std::collections::BTreeMap;

use crate::types::LibraryEntry;

/// Reference counts over a source library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageStats {
    /// Provider name → number of entries using it.
    pub providers: BTreeMap<String, usize>,
    /// Source category id → number of entries in it.
    pub categories: BTreeMap<i64, usize>,
}

impl UsageStats {
    /// Referenced provider names in ascending order.
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Entries referencing `category_id`; 0 for unused categories.
    pub fn category_refs(&self, category_id: i64) -> usize {
        self.categories.get(&category_id).copied().unwrap_or(0)
    }

    pub fn provider_refs(&self, provider: &str) -> usize {
        self.providers.get(provider).copied().unwrap_or(0)
    }
}

/// Count provider and category references in a single pass.
pub fn aggregate_usage<'a, I>(entries: I) -> UsageStats
where
    I: IntoIterator<Item = &'a LibraryEntry>,
{
    let mut stats = UsageStats::default();
    for entry in entries {
        *stats.providers.entry(entry.provider.clone()).or_default() += 1;
        *stats.categories.entry(entry.category_id).or_default() += 1;
    }
    stats
}
