//! Fuzzy matching of source provider names against the destination catalog.
//!
//! There is no identifier shared by the two apps, so providers are matched by
//! the Levenshtein distance between normalized names. The search is a plain
//! O(sources × destinations) scan; catalogs hold tens to a few hundred
//! providers.

use crate::normalize::normalize_provider_name;
use crate::types::{ProviderMapping, UnmatchedProvider};

/// Outcome of matching a set of source providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Accepted matches.
    pub mapping: ProviderMapping,
    /// Providers left unmapped, in the order they were examined.
    pub unmatched: Vec<UnmatchedProvider>,
    /// The destination catalog had no providers at all.
    pub empty_catalog: bool,
}

/// A destination name with its precomputed normalized form.
struct Candidate<'a> {
    name: &'a str,
    normalized: String,
}

/// Match every source provider name to its closest destination name.
///
/// A match is accepted when the distance is strictly below `threshold`, or
/// when the normalized names are identical. Ties keep the first destination
/// name in iteration order, so `destination_names` must be iterated in a
/// stable order for the result to be reproducible.
pub fn match_providers<'s, 'd, S, D>(
    source_names: S,
    destination_names: D,
    threshold: usize,
) -> MatchReport
where
    S: IntoIterator<Item = &'s str>,
    D: IntoIterator<Item = &'d str>,
{
    let candidates: Vec<Candidate<'d>> = destination_names
        .into_iter()
        .map(|name| Candidate {
            name,
            normalized: normalize_provider_name(name),
        })
        .collect();

    let mut report = MatchReport {
        empty_catalog: candidates.is_empty(),
        ..Default::default()
    };

    for source in source_names {
        let normalized = normalize_provider_name(source);
        match closest(&normalized, &candidates) {
            Some((best, distance)) if distance == 0 || distance < threshold => {
                log::debug!(
                    "Matched source '{}' -> '{}' (distance {})",
                    source,
                    best,
                    distance
                );
                report.mapping.insert(source.to_string(), best.to_string());
            }
            best => {
                log::debug!("Source not matched: '{}', best {:?}", source, best);
                report.unmatched.push(UnmatchedProvider {
                    name: source.to_string(),
                    best_candidate: best.map(|(name, _)| name.to_string()),
                    distance: best.map(|(_, d)| d),
                });
            }
        }
    }

    report
}

/// Find the candidate with the smallest distance; first seen wins ties.
fn closest<'d>(normalized: &str, candidates: &[Candidate<'d>]) -> Option<(&'d str, usize)> {
    let mut best: Option<(&'d str, usize)> = None;
    for candidate in candidates {
        let distance = edit_distance(normalized, &candidate.normalized);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate.name, distance));
            if distance == 0 {
                break;
            }
        }
    }
    best
}

/// Levenshtein distance between two strings, counted in `char`s.
///
/// Insertions, deletions and substitutions each cost 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
