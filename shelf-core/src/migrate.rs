//! End-to-end migration: snapshot, plan, then a single append.
//!
//! The destination is only read while planning. Every new record is
//! computed up front from an immutable [`DestinationSnapshot`], and the
//! result is committed with one [`DestinationLibrary::append`] call, so a
//! failed run leaves the destination exactly as it was.

use std::collections::HashMap;

use thiserror::Error;

use crate::matcher::{MatchReport, match_providers};
use crate::merge::{MergeError, merge_entries};
use crate::progress::MergeProgress;
use crate::reconcile::reconcile_categories;
use crate::types::*;
use crate::usage::{UsageStats, aggregate_usage};

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),
}

/// A destination backup that migrated records can be appended to.
pub trait DestinationLibrary {
    /// Categories currently present, including any appended earlier.
    fn categories(&self) -> &[DestinationCategory];

    /// Providers known to the destination, in backup order.
    fn providers(&self) -> &[DestinationProviderEntry];

    /// Append new records. Existing records must not be modified.
    fn append(
        &mut self,
        categories: Vec<DestinationCategory>,
        entries: Vec<DestinationLibraryEntry>,
    );
}

/// Tunables for a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    pub match_threshold: usize,
    pub category_prefix: String,
    pub category_flags: i64,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            category_prefix: DEFAULT_CATEGORY_PREFIX.to_string(),
            category_flags: MIGRATED_CATEGORY_FLAG,
        }
    }
}

/// Read-only view of the destination taken before anything is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationSnapshot {
    /// Highest existing category id, 0 when there are none.
    pub max_category_id: i64,
    /// Highest existing category order, 0 when there are none.
    pub max_category_order: i64,
    /// Unique provider names in first-seen order.
    pub provider_names: Vec<String>,
    /// Provider name → destination provider id; the last duplicate wins.
    pub provider_ids: HashMap<String, i64>,
}

impl DestinationSnapshot {
    pub fn capture<D: DestinationLibrary + ?Sized>(destination: &D) -> Self {
        Self::from_parts(destination.categories(), destination.providers())
    }

    pub fn from_parts(
        categories: &[DestinationCategory],
        providers: &[DestinationProviderEntry],
    ) -> Self {
        let mut snapshot = Self {
            max_category_id: categories.iter().map(|c| c.id).max().unwrap_or(0),
            max_category_order: categories.iter().map(|c| c.order).max().unwrap_or(0),
            ..Default::default()
        };

        for provider in providers {
            match snapshot
                .provider_ids
                .insert(provider.name.clone(), provider.provider_id)
            {
                Some(previous) => log::warn!(
                    "Duplicate destination source '{}': id {} replaces {}",
                    provider.name,
                    provider.provider_id,
                    previous
                ),
                None => snapshot.provider_names.push(provider.name.clone()),
            }
        }

        snapshot
    }
}

/// Everything a run would append, plus its diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    pub usage: UsageStats,
    pub matches: MatchReport,
    pub category_mapping: CategoryMapping,
    pub new_categories: Vec<DestinationCategory>,
    pub new_entries: Vec<DestinationLibraryEntry>,
    pub skips: Vec<SkipRecord>,
}

/// Summary of a committed migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub usage: UsageStats,
    pub provider_mapping: ProviderMapping,
    pub unmatched: Vec<UnmatchedProvider>,
    /// The destination knew no providers; usually a setup mistake.
    pub empty_catalog: bool,
    pub categories_created: usize,
    pub imported: usize,
    pub skips: Vec<SkipRecord>,
}

impl From<&MigrationPlan> for MigrationReport {
    fn from(plan: &MigrationPlan) -> Self {
        Self {
            usage: plan.usage.clone(),
            provider_mapping: plan.matches.mapping.clone(),
            unmatched: plan.matches.unmatched.clone(),
            empty_catalog: plan.matches.empty_catalog,
            categories_created: plan.new_categories.len(),
            imported: plan.new_entries.len(),
            skips: plan.skips.clone(),
        }
    }
}

/// Compute all new destination records without touching the destination.
///
/// Only providers actually referenced by the source entries are matched.
pub fn plan_migration(
    source: &SourceLibrary,
    snapshot: &DestinationSnapshot,
    options: &MigrationOptions,
    progress: &dyn MergeProgress,
) -> Result<MigrationPlan, MigrateError> {
    let usage = aggregate_usage(&source.entries);

    let matches = match_providers(
        usage.provider_names(),
        snapshot.provider_names.iter().map(String::as_str),
        options.match_threshold,
    );
    log::debug!(
        "Matched {} of {} referenced sources",
        matches.mapping.len(),
        usage.providers.len()
    );

    let categories = reconcile_categories(
        &source.categories,
        snapshot.max_category_id,
        snapshot.max_category_order,
        &options.category_prefix,
        options.category_flags,
    );

    let merged = merge_entries(
        &source.entries,
        &matches.mapping,
        &categories.mapping,
        &snapshot.provider_ids,
        progress,
    )?;

    Ok(MigrationPlan {
        usage,
        matches,
        category_mapping: categories.mapping,
        new_categories: categories.categories,
        new_entries: merged.entries,
        skips: merged.skips,
    })
}

/// Plan a migration against `destination` and commit it in one append.
pub fn migrate<D: DestinationLibrary + ?Sized>(
    source: &SourceLibrary,
    destination: &mut D,
    options: &MigrationOptions,
    progress: &dyn MergeProgress,
) -> Result<MigrationReport, MigrateError> {
    let snapshot = DestinationSnapshot::capture(destination);
    let plan = plan_migration(source, &snapshot, options, progress)?;
    let report = MigrationReport::from(&plan);
    destination.append(plan.new_categories, plan.new_entries);
    Ok(report)
}
