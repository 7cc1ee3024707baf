//! Data model shared by the migration stages.
//!
//! Source records live in Kotatsu's namespace (provider names, category ids);
//! destination records live in Mihon's. Nothing is comparable across the two
//! until it has gone through the matcher or the reconciler.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Edit distance below which a provider match is accepted.
pub const DEFAULT_MATCH_THRESHOLD: usize = 4;

/// Flag bit marking categories created by a migration run.
pub const MIGRATED_CATEGORY_FLAG: i64 = 64;

/// Prefix prepended (with `_`) to the titles of migrated categories.
pub const DEFAULT_CATEGORY_PREFIX: &str = "kotatsu";

// ── Source side ─────────────────────────────────────────────────────────────

/// A category as defined in the source backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i64,
    pub title: String,
}

/// One tracked title from the source library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Category id in the source numbering space.
    pub category_id: i64,
    /// Provider name in the source namespace.
    pub provider: String,
    pub title: String,
    pub public_url: String,
}

/// The already-parsed content of a source backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLibrary {
    pub categories: Vec<CategoryRecord>,
    pub entries: Vec<LibraryEntry>,
}

impl SourceLibrary {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.entries.is_empty()
    }
}

// ── Destination side ────────────────────────────────────────────────────────

/// A category in the destination numbering space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationCategory {
    pub id: i64,
    pub title: String,
    pub order: i64,
    pub flags: i64,
}

/// A provider known to the destination app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationProviderEntry {
    pub name: String,
    pub provider_id: i64,
}

/// A library entry shaped for the destination backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationLibraryEntry {
    pub provider_id: i64,
    /// Path component of the source public URL.
    pub url_path: String,
    pub title: String,
    /// Destination category `order` values.
    pub category_ids: BTreeSet<i64>,
    /// Always false for migrated entries: the app re-fetches metadata.
    pub initialized: bool,
}

// ── Mappings ────────────────────────────────────────────────────────────────

/// Source provider name → destination provider name.
///
/// Providers without an acceptable match are absent; absence means "skip".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMapping(BTreeMap<String, String>);

impl ProviderMapping {
    pub(crate) fn insert(&mut self, source: String, destination: String) {
        self.0.insert(source, destination);
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.0.get(source).map(String::as_str)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.0.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(source, destination)` pairs in source-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }
}

/// Source category id → destination category `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping(BTreeMap<i64, i64>);

impl CategoryMapping {
    pub(crate) fn insert(&mut self, source_id: i64, order: i64) {
        self.0.insert(source_id, order);
    }

    pub fn get(&self, source_id: i64) -> Option<i64> {
        self.0.get(&source_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.0.iter().map(|(&s, &o)| (s, o))
    }
}

// ── Diagnostics ─────────────────────────────────────────────────────────────

/// Why a source entry was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnmatchedProvider,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::UnmatchedProvider => "unmatched_provider",
        }
    }
}

/// A source entry intentionally excluded from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    /// Position of the entry in the source library.
    pub index: usize,
    pub reason: SkipReason,
    pub entry: LibraryEntry,
}

/// A source provider with no destination candidate under the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedProvider {
    pub name: String,
    /// Closest destination name, `None` when the destination catalog is empty.
    pub best_candidate: Option<String>,
    pub distance: Option<usize>,
}
