//! Conversion of source library entries into destination entries.
//!
//! Each entry is resolved through the provider mapping and the category
//! mapping. An unmatched provider is a per-entry skip; a category missing
//! from the mapping means the caller merged before reconciling, and aborts.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::progress::{EntryOutcome, MergeProgress};
use crate::types::{
    CategoryMapping, DestinationLibraryEntry, LibraryEntry, ProviderMapping, SkipReason,
    SkipRecord,
};

/// Invariant violations detected while merging. These abort the run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("entry '{title}' references source category {category_id}, which was never reconciled")]
    UnreconciledCategory { category_id: i64, title: String },

    #[error("provider mapping points at '{name}', which is not in the destination catalog")]
    UnknownDestinationProvider { name: String },
}

/// Entries to append plus the entries that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub entries: Vec<DestinationLibraryEntry>,
    pub skips: Vec<SkipRecord>,
}

/// Build a destination entry for every source entry whose provider is mapped.
///
/// Entries are processed in input order. Nothing outside the returned
/// [`MergeOutcome`] is touched.
pub fn merge_entries(
    entries: &[LibraryEntry],
    provider_mapping: &ProviderMapping,
    category_mapping: &CategoryMapping,
    destination_provider_ids: &HashMap<String, i64>,
    progress: &dyn MergeProgress,
) -> Result<MergeOutcome, MergeError> {
    let mut outcome = MergeOutcome::default();
    let total = entries.len();

    for (index, entry) in entries.iter().enumerate() {
        let Some(destination_name) = provider_mapping.get(&entry.provider) else {
            outcome.skips.push(SkipRecord {
                index,
                reason: SkipReason::UnmatchedProvider,
                entry: entry.clone(),
            });
            progress.on_entry(
                index + 1,
                total,
                EntryOutcome::Skipped {
                    title: &entry.title,
                    provider: &entry.provider,
                },
            );
            continue;
        };

        let provider_id = *destination_provider_ids.get(destination_name).ok_or_else(|| {
            MergeError::UnknownDestinationProvider {
                name: destination_name.to_string(),
            }
        })?;

        let order = category_mapping.get(entry.category_id).ok_or_else(|| {
            MergeError::UnreconciledCategory {
                category_id: entry.category_id,
                title: entry.title.clone(),
            }
        })?;

        outcome.entries.push(DestinationLibraryEntry {
            provider_id,
            url_path: url_path(&entry.public_url),
            title: entry.title.clone(),
            category_ids: BTreeSet::from([order]),
            initialized: false,
        });
        progress.on_entry(
            index + 1,
            total,
            EntryOutcome::Imported {
                title: &entry.title,
                provider: &entry.provider,
            },
        );
    }

    Ok(outcome)
}

/// Extract the path component of a URL, leaving its characters untouched.
///
/// Scheme, authority, query and fragment are dropped, as are `;params` on
/// the last segment of web-style URLs. Strings without a scheme are treated
/// as relative references.
///
/// ```
/// use shelf_core::merge::url_path;
///
/// assert_eq!(url_path("https://mangadex.org/title/abc?tab=art"), "/title/abc");
/// assert_eq!(url_path("/manga/one-piece"), "/manga/one-piece");
/// ```
pub fn url_path(public_url: &str) -> String {
    let end = public_url.find('#').unwrap_or(public_url.len());
    let without_fragment = &public_url[..end];
    let end = without_fragment.find('?').unwrap_or(without_fragment.len());
    let mut rest = &without_fragment[..end];
    let mut scheme = "";

    if let Some(colon) = rest.find(':') {
        if is_scheme(&rest[..colon]) {
            scheme = &rest[..colon];
            rest = &rest[colon + 1..];
        }
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        rest = match after_slashes.find('/') {
            Some(slash) => &after_slashes[slash..],
            None => "",
        };
    }

    if uses_params(scheme) {
        let last_segment = rest.rfind('/').map_or(0, |slash| slash + 1);
        if let Some(semi) = rest[last_segment..].find(';') {
            rest = &rest[..last_segment + semi];
        }
    }

    rest.to_string()
}

/// Schemes whose last path segment may carry `;params`.
fn uses_params(scheme: &str) -> bool {
    const SCHEMES: &[&str] = &[
        "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
        "sips", "mms", "sftp", "tel",
    ];
    SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme))
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
